use std::path::Path;

use thiserror::Error;

/// Suffix marking a file as a deployment script for the tool's script
/// runner.
pub const SCRIPT_SUFFIX: &str = ".s.sol";

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
	#[error("not a deployment script: expected a path ending in {SCRIPT_SUFFIX}, got {0}")]
	BadSuffix(String),
	#[error("no broadcast region: the script never calls startBroadcast")]
	NoBroadcast,
	#[error("broadcast region opened on line {0} is never closed (missing stopBroadcast)")]
	UnclosedBroadcast(usize),
	#[error("stopBroadcast on line {0} has no matching startBroadcast")]
	StrayStop(usize),
	#[error("broadcast region contains no contract creation")]
	NoCreation,
}

/// What the lint found inside the script's broadcast region.
#[derive(Debug, PartialEq)]
pub struct ScriptReport {
	/// Names of contracts created inside the region, in source order.
	pub creations: Vec<String>,
	pub warnings: Vec<String>,
}

/// Check the deployment-script suffix convention.
pub fn check_suffix(path: &Path) -> Result<(), ScriptError> {
	let name = path.to_string_lossy();
	if name.ends_with(SCRIPT_SUFFIX) {
		Ok(())
	} else {
		Err(ScriptError::BadSuffix(name.into_owned()))
	}
}

/// Lint a script's source text.
///
/// The checks mirror what the script runner expects of a deployment
/// script: a broadcast region that is opened once, closed before the
/// procedure returns, and issues at least one contract creation.  More
/// than one creation is legal but worth flagging, since each one costs
/// a real transaction once broadcast.
pub fn lint_source(source: &str) -> Result<ScriptReport, ScriptError> {
	let mut region_open_line: Option<usize> = None;
	let mut saw_region = false;
	let mut creations = Vec::new();
	let mut warnings = Vec::new();

	for (idx, raw) in source.lines().enumerate() {
		let line_no = idx + 1;
		let code = strip_line_comment(raw);

		if code.contains("startBroadcast") {
			if region_open_line.is_some() {
				warnings.push(format!(
					"startBroadcast on line {line_no} inside an already open region"
				));
			} else {
				region_open_line = Some(line_no);
				saw_region = true;
			}
		}

		if region_open_line.is_some() {
			creations.extend(creation_names(code));
		}

		if code.contains("stopBroadcast") {
			if region_open_line.is_none() {
				return Err(ScriptError::StrayStop(line_no));
			}
			region_open_line = None;
		}
	}

	if let Some(open_line) = region_open_line {
		return Err(ScriptError::UnclosedBroadcast(open_line));
	}
	if !saw_region {
		return Err(ScriptError::NoBroadcast);
	}
	if creations.is_empty() {
		return Err(ScriptError::NoCreation);
	}
	if creations.len() > 1 {
		warnings.push(format!(
			"broadcast region issues {} contract creations; each one becomes a separate transaction",
			creations.len()
		));
	}

	Ok(ScriptReport { creations, warnings })
}

/// Check the suffix, read the file, and lint it.
pub fn lint_file(path: &Path) -> anyhow::Result<ScriptReport> {
	check_suffix(path)?;
	let source = std::fs::read_to_string(path)?;
	Ok(lint_source(&source)?)
}

/// Extract the contract names from `new Ident(` occurrences in one line.
/// The `new` must stand on its own: `renew Counter(...)` is a call, not
/// a creation.
fn creation_names(code: &str) -> Vec<String> {
	let mut names = Vec::new();
	let mut search_from = 0;
	while let Some(rel) = code[search_from..].find("new ") {
		let pos = search_from + rel;
		search_from = pos + 4;

		let boundary_ok = code[..pos]
			.chars()
			.next_back()
			.map_or(true, |c| !c.is_alphanumeric() && c != '_');
		if !boundary_ok {
			continue;
		}

		let rest = &code[pos + 4..];
		let ident: String = rest
			.chars()
			.take_while(|c| c.is_alphanumeric() || *c == '_')
			.collect();
		if !ident.is_empty() && rest[ident.len()..].trim_start().starts_with('(') {
			names.push(ident);
		}
	}
	names
}

fn strip_line_comment(line: &str) -> &str {
	match line.find("//") {
		Some(pos) => &line[..pos],
		None => line,
	}
}
