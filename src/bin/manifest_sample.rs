use anyhow::Context;
use stimuli_manifest::cli::{manifest_config, sample_command, sample_config};
use stimuli_manifest::logging::init_tracing;
use stimuli_manifest::manifest::{display_path, run_sample};
use stimuli_manifest::sampling::source_for;
use stimuli_manifest::ManifestConfig;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let matches = sample_command().get_matches();
    let config = manifest_config(&matches, ManifestConfig::sample());
    let sample = sample_config(&matches);

    let mut source = source_for(&sample);
    let report = run_sample(&config, &sample, source.as_mut()).with_context(|| {
        format!("Couldn't sample manifest from {}", config.stimuli_root().display())
    })?;

    println!("Images found: {}", report.images_found);
    println!(
        "Folders: {} | picked this run: {} | per folder: {}",
        report.folders_available, report.folders_picked, report.per_folder
    );
    if report.topped_up > 0 {
        println!("Topped up with {} images from the remaining pool", report.topped_up);
    }
    println!("Wrote {} images:", report.written);
    println!("   - {}", display_path(&report.json_path));
    println!("   - {}", display_path(&report.js_path));
    Ok(())
}
