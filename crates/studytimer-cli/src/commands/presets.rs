use studytimer_core::Config;

/// One line per preset: position, label and duration.
pub fn listing(config: &Config) -> String {
    if config.presets.is_empty() {
        return "no presets configured".to_string();
    }
    let width = config
        .presets
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    config
        .presets
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {:<width$}  {}", i + 1, p.label, p.formatted()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config.presets)?);
    } else {
        println!("{}", listing(&config));
    }
    Ok(())
}
