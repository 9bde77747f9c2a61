use anyhow::Context;
use stimuli_manifest::cli::{full_command, manifest_config};
use stimuli_manifest::logging::init_tracing;
use stimuli_manifest::manifest::{display_path, run_full};
use stimuli_manifest::ManifestConfig;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let matches = full_command().get_matches();
    let config = manifest_config(&matches, ManifestConfig::full());

    let report = run_full(&config).with_context(|| {
        format!("Couldn't build manifest from {}", config.stimuli_root().display())
    })?;

    println!(
        "Wrote {} with {} images from {} categories",
        display_path(&report.json_path),
        report.images,
        report.categories
    );
    println!("Wrote {}", display_path(&report.js_path));
    Ok(())
}
