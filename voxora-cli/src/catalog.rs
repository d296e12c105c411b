use voxora_core::catalog::LANGUAGES;

pub fn print_languages() {
    for language in LANGUAGES {
        println!("{} ({})", language.name, language.code);
        for voice in language.voices {
            let engines: Vec<&str> = if voice.engines.is_empty() {
                vec!["default"]
            } else {
                voice.engines.iter().map(|e| e.name()).collect()
            };
            println!("  {:<10} {}", voice.id, engines.join(", "));
        }
    }
}
