//! Apply a JSON rule file to an XML document and print the result
//!
//! ```text
//! cargo run -p rules --example apply_rules -- input.xml rules.json
//! ```

use std::path::Path;

use rules::{load_rules_from_file, RuleEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(xml_path), Some(rules_path)) = (args.next(), args.next()) else {
        eprintln!("usage: apply_rules <document.xml> <rules.json>");
        std::process::exit(2);
    };

    let xml = std::fs::read_to_string(&xml_path)?;
    let mut engine = RuleEngine::from_xml(&xml)?;

    println!("Before:\n{}\n", engine.to_xml()?);

    let rules = load_rules_from_file(Path::new(&rules_path))?;
    engine.add_rules(rules);
    engine.execute()?;

    println!("After:\n{}\n", engine.to_xml()?);

    if engine.is_valid() {
        println!("Document is valid");
    } else {
        println!("Validation log:\n{}", engine.validation_log());
    }

    Ok(())
}
