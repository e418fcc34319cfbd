use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Built-in guess list used when no word list file is available.
pub const DEFAULT_WORDS: &[&str] = &[
    "mazda", "toyota", "subaru", "honda", "nissan", "suzuki", "lexus", "datsun",
];

const APP_DIR: &str = "leword";
const WORDS_FILE: &str = "words.txt";

#[must_use]
pub fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect()
}

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    if !word.is_empty() && word.chars().all(char::is_alphabetic) {
        Some(word)
    } else {
        None
    }
}

pub fn load_words_from_str(data: &str) -> Vec<String> {
    data.lines().filter_map(normalize).collect()
}

pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?) {
            words.push(word);
        }
    }
    Ok(words)
}

/// `<config dir>/leword/words.txt`, when the platform has a config dir.
#[must_use]
pub fn default_words_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(WORDS_FILE))
}
