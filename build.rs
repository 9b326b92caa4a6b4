// Build-time regex pattern validation for the trace parsers
use regex::Regex;
use std::fs::File;
use std::io::Write;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");

    // All regex patterns used by the parser and classifier
    let patterns = &[
        // Legacy free-text latency phrase, e.g. "Took 0.42s"
        (
            r"Took\s+(?P<value>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)(?P<unit>[A-Za-z]*)",
            "took_latency",
        ),
        // Load balancer health probes that carry no request context
        (r#""GET / HTTP/1\.1" 200"#, "health_check_access"),
    ];

    let mut valid_patterns = Vec::new();
    let mut invalid_patterns = Vec::new();

    for &(pattern, name) in patterns {
        match Regex::new(pattern) {
            Ok(_) => valid_patterns.push((pattern, name)),
            Err(e) => {
                println!("cargo:warning=Invalid regex pattern '{name}': {e}");
                invalid_patterns.push((pattern, name, e));
            }
        }
    }

    if !invalid_patterns.is_empty() {
        let mut error_msg = String::from("Build failed due to invalid regex patterns:\n");
        for (pattern, name, error) in &invalid_patterns {
            error_msg.push_str(&format!("  - '{name}': {error} (pattern: {pattern})\n"));
        }
        panic!("{}", error_msg);
    }

    if let Err(e) = generate_validated_regexes(&valid_patterns) {
        panic!("Failed to generate regex patterns: {e}");
    }
}

fn generate_validated_regexes(patterns: &[(&str, &str)]) -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let dest_path = std::path::Path::new(&out_dir).join("validated_regexes.rs");
    let mut file = File::create(dest_path)?;

    writeln!(file, "// Auto-generated regex patterns (validated by build.rs)")?;
    writeln!(file, "use crate::parser::regex_patterns::StaticRegexSet;")?;
    writeln!(file)?;
    writeln!(file, "/// All validated regex patterns used in the codebase")?;
    writeln!(
        file,
        "pub static VALIDATED_PATTERNS: StaticRegexSet = StaticRegexSet::new(&["
    )?;

    for (pattern, name) in patterns {
        writeln!(file, "    (r##\"{pattern}\"##, \"{name}\"),")?;
    }

    writeln!(file, "]);")?;
    writeln!(file)?;

    writeln!(file, "/// Pattern indices for type-safe access")?;
    writeln!(file, "pub mod pattern_index {{")?;
    for (i, (_, name)) in patterns.iter().enumerate() {
        let const_name = name.to_uppercase();
        writeln!(file, "    pub const {const_name}: usize = {i};")?;
    }
    writeln!(file, "}}")?;

    writeln!(file)?;
    writeln!(file, "/// Pattern name lookup")?;
    writeln!(
        file,
        "pub fn get_pattern_name(index: usize) -> Option<&'static str> {{"
    )?;
    writeln!(file, "    match index {{")?;
    for (i, (_, name)) in patterns.iter().enumerate() {
        writeln!(file, "        {i} => Some(\"{name}\"),")?;
    }
    writeln!(file, "        _ => None,")?;
    writeln!(file, "    }}")?;
    writeln!(file, "}}")?;

    Ok(())
}
