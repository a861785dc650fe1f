//! Scene validation command

use super::{format_structured, OutputFormat};
use anyhow::{Context, Result};
use puppet_core::NodeIdAllocator;
use puppet_scene::{build_tree, validate_scene, SceneFile};
use serde::Serialize;

pub struct ValidateArgs {
    pub scene: String,
    pub strict: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    pub scene: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// Parse and build a scene, collecting what goes wrong instead of stopping
pub fn check(scene_name: &str, content: &str) -> ValidationReport {
    let mut report = ValidationReport {
        scene: scene_name.to_string(),
        ..Default::default()
    };

    let scene_file: SceneFile = match toml::from_str(content) {
        Ok(file) => file,
        Err(e) => {
            report.errors.push(format!("Parse error: {}", e));
            return report;
        }
    };

    report.warnings = validate_scene(&scene_file);
    if let Err(e) = build_tree(&scene_file, &mut NodeIdAllocator::new()) {
        report.errors.push(e.to_string());
    }
    report
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("Failed to read scene '{}'", args.scene))?;
    let report = check(&args.scene, &content);

    match args.format {
        OutputFormat::Text => print_report_text(&report),
        _ => println!("{}", format_structured(&report, args.format)?),
    }

    if !report.is_valid(args.strict) {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report_text(report: &ValidationReport) {
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("{}: OK", report.scene);
        return;
    }

    println!(
        "{}: {} error(s), {} warning(s)",
        report.scene,
        report.errors.len(),
        report.warnings.len()
    );
    for error in &report.errors {
        println!("  [ERROR] {}", error);
    }
    for warning in &report.warnings {
        println!("  [WARN ] {}", warning);
    }
}
