use std::path::Path;

use anyhow::Result;

use crate::script;

pub fn run(path: &Path) -> Result<()> {
	let report = script::lint_file(path)?;

	println!("{}: ok", path.display());
	println!(
		"Broadcast region creates: {}",
		report.creations.join(", ")
	);
	for warning in &report.warnings {
		println!("warning: {warning}");
	}
	Ok(())
}
