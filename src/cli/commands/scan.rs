//! Scan command implementation
//!
//! Runs the local extraction and disambiguation pass only. Useful for
//! exercising the pattern library without a detection service.

use crate::cli::commands::read_input;
use crate::config::load_config;
use crate::detection::disambiguator::Disambiguator;
use crate::detection::extractor::EntityExtractor;
use crate::detection::patterns::PatternRegistry;
use crate::domain::entity::Entity;
use crate::highlight::geometry::Point;
use crate::highlight::placer::HighlightPlacer;
use crate::highlight::surface::MonospaceMetrics;
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Text to scan
    #[arg(short, long)]
    pub text: Option<String>,

    /// File to scan; stdin is used when neither --text nor --file is given
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format (table or json)
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Show highlight regions computed with monospace metrics
    #[arg(long)]
    pub preview: bool,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    total_count: usize,
    entities: Vec<ScanEntity<'a>>,
}

#[derive(Serialize)]
struct ScanEntity<'a> {
    #[serde(rename = "type")]
    entity_type: String,
    text: &'a str,
    confidence: f32,
    start: usize,
    end: usize,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let input = read_input(&self.text, &self.file)?;
        tracing::info!(len = input.len(), "Scanning with local patterns");

        let registry = if Path::new(config_path).exists() {
            match load_config(config_path)?.detection.pattern_library {
                Some(path) => PatternRegistry::from_file(path)?,
                None => PatternRegistry::default_patterns()?,
            }
        } else {
            PatternRegistry::default_patterns()?
        };

        let extractor = EntityExtractor::with_registry(registry);
        let disambiguator = Disambiguator::new();
        let candidates = extractor.scan(&input);
        let entities = disambiguator.validate_all(&candidates, &input);

        match self.format.as_str() {
            "json" => print_json(&input, &entities)?,
            _ => print_table(&input, &entities),
        }

        if self.preview && !entities.is_empty() {
            print_preview(&input, &entities);
        }

        Ok(0)
    }
}

fn print_json(input: &str, entities: &[Entity]) -> anyhow::Result<()> {
    let report = ScanReport {
        total_count: entities.len(),
        entities: entities
            .iter()
            .map(|e| ScanEntity {
                entity_type: e.entity_type.label().to_string(),
                text: e.span(input),
                confidence: e.confidence,
                start: e.start,
                end: e.end,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_table(input: &str, entities: &[Entity]) {
    if entities.is_empty() {
        println!("No PII detected");
        return;
    }

    println!("{} entities detected:", entities.len());
    println!();
    println!("{:<16} {:<10} {:>6}..{:<6} TEXT", "TYPE", "CONF", "START", "END");
    for entity in entities {
        println!(
            "{:<16} {:<10.2} {:>6}..{:<6} {}",
            entity.entity_type.label(),
            entity.confidence,
            entity.start,
            entity.end,
            entity.span(input)
        );
    }
}

fn print_preview(input: &str, entities: &[Entity]) {
    struct PreviewSurface<'a> {
        id: crate::highlight::surface::SurfaceId,
        text: &'a str,
        metrics: MonospaceMetrics,
    }

    impl crate::highlight::surface::Surface for PreviewSurface<'_> {
        fn id(&self) -> crate::highlight::surface::SurfaceId {
            self.id
        }
        fn descriptor(&self) -> crate::domain::events::SurfaceDescriptor {
            crate::domain::events::SurfaceDescriptor::new(
                crate::domain::events::SurfaceKind::Flat,
                "cli",
                "",
                "local",
            )
        }
        fn text(&self) -> String {
            self.text.to_string()
        }
        fn geometry(&self) -> crate::highlight::surface::Geometry<'_> {
            crate::highlight::surface::Geometry::Flat(&self.metrics)
        }
        fn bounding_box(
            &self,
        ) -> Result<crate::highlight::geometry::Rect, crate::domain::errors::GeometryError>
        {
            Ok(crate::highlight::geometry::Rect::new(
                0.0,
                0.0,
                self.text.chars().count() as f32 * 8.0,
                16.0,
            ))
        }
    }

    let surface = PreviewSurface {
        id: crate::highlight::surface::SurfaceId::new(),
        text: input,
        metrics: MonospaceMetrics::new(Point::default(), 8.0, 16.0),
    };

    let regions = HighlightPlacer::new().place(&surface, entities, input);
    println!();
    println!("Highlight preview (monospace metrics, 8x16 cells):");
    for region in &regions {
        println!(
            "  [{:>7.1}, {:>5.1}, {:>7.1}, {:>5.1}] {}",
            region.rect.x, region.rect.y, region.rect.w, region.rect.h, region.label_text
        );
    }
}
