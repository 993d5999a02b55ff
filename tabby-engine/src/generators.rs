//! Random value generators for template placeholders
//!
//! Each generator maps optional string parameters and a [`RandomSource`] to a
//! string value. Numeric parameters that do not parse fall back to the
//! generator's defaults. The registry is built once and only read afterwards.

use crate::random::{RandomSource, SecureRandom};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Signature shared by every generator
pub type GeneratorFn = fn(&[String], &dyn RandomSource) -> String;

pub const FIRST_NAMES: [&str; 32] = [
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda",
    "William", "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Christopher", "Nancy", "Daniel", "Lisa",
    "Matthew", "Betty", "Anthony", "Margaret", "Mark", "Sandra", "Donald", "Ashley",
];

pub const LAST_NAMES: [&str; 32] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
    "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young",
];

pub const DOMAINS: [&str; 10] = [
    "gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "example.com",
    "test.com", "demo.com", "mail.com", "email.com", "inbox.com",
];

pub const WORDS: [&str; 25] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit",
    "sed", "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore",
    "magna", "aliqua", "enim", "ad", "minim", "veniam", "quis", "nostrud",
];

pub const SENTENCES: [&str; 8] = [
    "This is a test message.",
    "Thank you for your assistance.",
    "Please review the attached document.",
    "Looking forward to your response.",
    "I hope this message finds you well.",
    "Could you please provide more information?",
    "I appreciate your help with this matter.",
    "Let me know if you need anything else.",
];

/// Catalog entry shown by `tabby placeholders`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlaceholderInfo {
    pub example: &'static str,
    pub description: &'static str,
}

pub const PLACEHOLDER_CATALOG: &[PlaceholderInfo] = &[
    PlaceholderInfo { example: "{{name}}", description: "Random full name (e.g., John Smith)" },
    PlaceholderInfo { example: "{{firstname}}", description: "Random first name (e.g., John)" },
    PlaceholderInfo { example: "{{lastname}}", description: "Random last name (e.g., Smith)" },
    PlaceholderInfo { example: "{{email}}", description: "Random email address" },
    PlaceholderInfo { example: "{{phone}}", description: "Random phone number (+1-DDD-DDD-DDDD)" },
    PlaceholderInfo { example: "{{number}}", description: "Random number (1-100)" },
    PlaceholderInfo { example: "{{number:1:50}}", description: "Random number in [min, max)" },
    PlaceholderInfo { example: "{{float}}", description: "Random float (0-100, 2 decimals)" },
    PlaceholderInfo { example: "{{float:1:50:3}}", description: "Random float with range and decimals" },
    PlaceholderInfo { example: "{{price}}", description: "Random price ending in .99 (1-100)" },
    PlaceholderInfo { example: "{{price:5:50}}", description: "Random price with custom range" },
    PlaceholderInfo { example: "{{text}}", description: "Random paragraph" },
    PlaceholderInfo { example: "{{sentence}}", description: "Random sentence" },
    PlaceholderInfo { example: "{{uuid}}", description: "Random UUID (v4)" },
    PlaceholderInfo { example: "{{bool}}", description: "Random boolean (true/false)" },
    PlaceholderInfo { example: "{{date}}", description: "Random date within the last year (YYYY-MM-DD)" },
    PlaceholderInfo { example: "{{word}}", description: "Random lorem word" },
];

/// Name to generator mapping
pub struct GeneratorRegistry {
    generators: HashMap<&'static str, GeneratorFn>,
    random: Arc<dyn RandomSource>,
}

impl GeneratorRegistry {
    /// Registry with every built-in generator and OS randomness
    pub fn new() -> Self {
        Self::with_random_source(Arc::new(SecureRandom::new()))
    }

    /// Registry with every built-in generator and the given randomness
    pub fn with_random_source(random: Arc<dyn RandomSource>) -> Self {
        let entries: [(&'static str, GeneratorFn); 20] = [
            ("name", full_name),
            ("fullname", full_name),
            ("firstname", first_name),
            ("lastname", last_name),
            ("email", email),
            ("phone", phone),
            ("mobile", phone),
            ("number", number),
            ("int", number),
            ("float", float),
            ("decimal", float),
            ("price", price),
            ("text", paragraph),
            ("paragraph", paragraph),
            ("sentence", sentence),
            ("uuid", uuid_v4),
            ("bool", boolean),
            ("boolean", boolean),
            ("date", date),
            ("word", word),
        ];

        Self {
            generators: entries.into_iter().collect(),
            random,
        }
    }

    /// Process-wide registry, built on first use
    pub fn shared() -> Arc<GeneratorRegistry> {
        static SHARED: OnceLock<Arc<GeneratorRegistry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(GeneratorRegistry::new())).clone()
    }

    /// Generate a value; `None` when the type name is unknown
    pub fn generate(&self, type_name: &str, params: &[String]) -> Option<String> {
        self.generators
            .get(type_name)
            .map(|generator| generator(params, self.random.as_ref()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.generators.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.generators.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

fn first_name(_: &[String], random: &dyn RandomSource) -> String {
    random.pick(&FIRST_NAMES).to_string()
}

fn last_name(_: &[String], random: &dyn RandomSource) -> String {
    random.pick(&LAST_NAMES).to_string()
}

fn full_name(params: &[String], random: &dyn RandomSource) -> String {
    format!("{} {}", first_name(params, random), last_name(params, random))
}

fn email(_: &[String], random: &dyn RandomSource) -> String {
    let username = format!("{}{}", random.pick(&FIRST_NAMES), random.pick(&LAST_NAMES)).to_lowercase();
    format!("{}@{}", username, random.pick(&DOMAINS))
}

fn phone(_: &[String], random: &dyn RandomSource) -> String {
    format!(
        "+1-{:03}-{:03}-{:04}",
        random.below(900) + 100,
        random.below(900) + 100,
        random.below(9000) + 1000,
    )
}

/// Parse parameter `index`, keeping `default` when absent or malformed
fn param_or<T: std::str::FromStr>(params: &[String], index: usize, default: T) -> T {
    params
        .get(index)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn finite_param_or(params: &[String], index: usize, default: f64) -> f64 {
    let value = param_or(params, index, default);
    if value.is_finite() {
        value
    } else {
        default
    }
}

fn number(params: &[String], random: &dyn RandomSource) -> String {
    let min: i64 = param_or(params, 0, 1);
    let mut max: i64 = param_or(params, 1, 100);

    if max <= min {
        max = min.saturating_add(1);
    }

    let span = (max as i128 - min as i128) as u64;
    let value = min as i128 + random.below(span.max(1)) as i128;
    value.to_string()
}

const FLOAT_RESOLUTION: u64 = 10_000;

fn float(params: &[String], random: &dyn RandomSource) -> String {
    let min = finite_param_or(params, 0, 0.0);
    let mut max = finite_param_or(params, 1, 100.0);
    let decimals: usize = param_or(params, 2, 2);

    if max <= min {
        max = min + 1.0;
    }

    let fraction = random.below(FLOAT_RESOLUTION) as f64 / FLOAT_RESOLUTION as f64;
    let value = min + fraction * (max - min);
    format!("{:.*}", decimals.min(20), value)
}

fn price(params: &[String], random: &dyn RandomSource) -> String {
    let min = finite_param_or(params, 0, 1.0);
    let mut max = finite_param_or(params, 1, 100.0);

    if max <= min {
        max = min + 1.0;
    }

    let span = (max - min).floor().max(0.0) as u64;
    let whole = random.below(span) as i64 + min.floor() as i64;
    format!("{}.99", whole)
}

fn paragraph(_: &[String], random: &dyn RandomSource) -> String {
    let word_count = random.below(20) + 30;
    let text = (0..word_count)
        .map(|_| random.pick(&WORDS))
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => ".".to_string(),
    }
}

fn sentence(_: &[String], random: &dyn RandomSource) -> String {
    random.pick(&SENTENCES).to_string()
}

fn uuid_v4(_: &[String], random: &dyn RandomSource) -> String {
    let mut bytes = [0u8; 16];
    for byte in bytes.iter_mut() {
        *byte = random.below(256) as u8;
    }
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

fn boolean(_: &[String], random: &dyn RandomSource) -> String {
    if random.below(2) == 0 {
        "false".to_string()
    } else {
        "true".to_string()
    }
}

fn date(_: &[String], random: &dyn RandomSource) -> String {
    let days_back = random.below(365) as i64;
    let today = chrono::Local::now().date_naive();
    (today - chrono::Duration::days(days_back))
        .format("%Y-%m-%d")
        .to_string()
}

fn word(_: &[String], random: &dyn RandomSource) -> String {
    random.pick(&WORDS).to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use regex::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed sequence of draws, clamped into range
    pub(crate) struct ScriptedRandom {
        values: Vec<u64>,
        cursor: AtomicUsize,
    }

    impl ScriptedRandom {
        pub(crate) fn new(values: Vec<u64>) -> Self {
            Self {
                values,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn below(&self, max: u64) -> u64 {
            if max == 0 {
                return 0;
            }
            let i = self.cursor.fetch_add(1, Ordering::Relaxed);
            self.values[i % self.values.len()].min(max - 1)
        }
    }

    fn scripted(values: Vec<u64>) -> GeneratorRegistry {
        GeneratorRegistry::with_random_source(Arc::new(ScriptedRandom::new(values)))
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_registry_contains_all_types() {
        let registry = GeneratorRegistry::new();
        for name in [
            "name", "fullname", "firstname", "lastname", "email", "phone", "mobile", "number",
            "int", "float", "decimal", "price", "text", "paragraph", "sentence", "uuid", "bool",
            "boolean", "date", "word",
        ] {
            assert!(registry.contains(name), "missing generator {}", name);
        }
        assert!(!registry.contains("Name"));
        assert!(registry.generate("bogus", &[]).is_none());
    }

    #[test]
    fn test_full_name_uses_pools() {
        let registry = scripted(vec![0, 1]);
        assert_eq!(registry.generate("name", &[]).unwrap(), "James Johnson");
    }

    #[test]
    fn test_email_format() {
        let registry = GeneratorRegistry::new();
        let pattern = Regex::new(r"^[a-z]+@[a-z0-9.]+$").unwrap();
        for _ in 0..100 {
            let email = registry.generate("email", &[]).unwrap();
            assert!(pattern.is_match(&email), "bad email {}", email);

            let (local, domain) = email.split_once('@').unwrap();
            assert!(DOMAINS.contains(&domain));
            let composed = FIRST_NAMES.iter().any(|first| {
                let first = first.to_lowercase();
                local.starts_with(&first)
                    && LAST_NAMES
                        .iter()
                        .any(|last| local[first.len()..] == last.to_lowercase())
            });
            assert!(composed, "local part {} is not first+last", local);
        }
    }

    #[test]
    fn test_phone_format() {
        let registry = GeneratorRegistry::new();
        let pattern = Regex::new(r"^\+1-[1-9]\d{2}-[1-9]\d{2}-[1-9]\d{3}$").unwrap();
        for _ in 0..100 {
            let phone = registry.generate("mobile", &[]).unwrap();
            assert!(pattern.is_match(&phone), "bad phone {}", phone);
        }

        let lowest = scripted(vec![0]).generate("phone", &[]).unwrap();
        assert_eq!(lowest, "+1-100-100-1000");
        let highest = scripted(vec![u64::MAX]).generate("phone", &[]).unwrap();
        assert_eq!(highest, "+1-999-999-9999");
    }

    #[test]
    fn test_number_defaults_and_bounds() {
        let registry = GeneratorRegistry::new();
        for _ in 0..200 {
            let value: i64 = registry.generate("number", &[]).unwrap().parse().unwrap();
            assert!((1..100).contains(&value));
        }

        let lowest = scripted(vec![0]).generate("int", &params(&["5", "10"])).unwrap();
        assert_eq!(lowest, "5");
        let highest = scripted(vec![u64::MAX]).generate("int", &params(&["5", "10"])).unwrap();
        assert_eq!(highest, "9");
    }

    #[test]
    fn test_number_coerces_inverted_range() {
        let registry = GeneratorRegistry::new();
        for _ in 0..20 {
            assert_eq!(registry.generate("number", &params(&["7", "3"])).unwrap(), "7");
            assert_eq!(registry.generate("number", &params(&["7", "7"])).unwrap(), "7");
        }
    }

    #[test]
    fn test_number_non_numeric_params_fall_back() {
        let registry = scripted(vec![u64::MAX]);
        assert_eq!(registry.generate("number", &params(&["abc", "xyz"])).unwrap(), "99");
        assert_eq!(registry.generate("number", &params(&["-10", "nope"])).unwrap(), "99");
    }

    #[test]
    fn test_number_extreme_range_does_not_overflow() {
        let registry = GeneratorRegistry::new();
        let min = i64::MIN.to_string();
        let max = i64::MAX.to_string();
        let value: i64 = registry.generate("number", &params(&[&min, &max])).unwrap().parse().unwrap();
        assert!(value < i64::MAX);
        assert_eq!(
            registry.generate("number", &params(&[&max, "0"])).unwrap(),
            max
        );
    }

    #[test]
    fn test_float_formatting() {
        let registry = scripted(vec![5_000]);
        assert_eq!(registry.generate("float", &[]).unwrap(), "50.00");
        assert_eq!(registry.generate("decimal", &params(&["1", "3", "3"])).unwrap(), "2.000");
        assert_eq!(registry.generate("float", &params(&["x", "y", "z"])).unwrap(), "50.00");
        assert_eq!(registry.generate("float", &params(&["10", "2", "1"])).unwrap(), "10.5");
    }

    #[test]
    fn test_price_ends_in_99() {
        let registry = GeneratorRegistry::new();
        for _ in 0..100 {
            let price = registry.generate("price", &params(&["5", "50"])).unwrap();
            assert!(price.ends_with(".99"));
            let whole: i64 = price.trim_end_matches(".99").parse().unwrap();
            assert!((5..50).contains(&whole));
        }

        assert_eq!(scripted(vec![0]).generate("price", &[]).unwrap(), "1.99");
        assert_eq!(scripted(vec![0]).generate("price", &params(&["20", "10"])).unwrap(), "20.99");
    }

    #[test]
    fn test_paragraph_shape() {
        let registry = GeneratorRegistry::new();
        for _ in 0..50 {
            let text = registry.generate("text", &[]).unwrap();
            assert!(text.ends_with('.'));
            assert!(text.chars().next().unwrap().is_uppercase());

            let words: Vec<&str> = text.trim_end_matches('.').split(' ').collect();
            assert!((30..=49).contains(&words.len()), "{} words", words.len());
            for word in &words[1..] {
                assert!(WORDS.contains(word));
            }
        }
    }

    #[test]
    fn test_sentence_and_word_from_pools() {
        let registry = GeneratorRegistry::new();
        for _ in 0..20 {
            assert!(SENTENCES.contains(&registry.generate("sentence", &[]).unwrap().as_str()));
            assert!(WORDS.contains(&registry.generate("word", &[]).unwrap().as_str()));
        }
    }

    #[test]
    fn test_uuid_is_v4() {
        let registry = GeneratorRegistry::new();
        let pattern =
            Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap();
        for _ in 0..50 {
            let value = registry.generate("uuid", &[]).unwrap();
            assert!(pattern.is_match(&value), "bad uuid {}", value);
        }
    }

    #[test]
    fn test_bool_values() {
        assert_eq!(scripted(vec![0]).generate("bool", &[]).unwrap(), "false");
        assert_eq!(scripted(vec![1]).generate("boolean", &[]).unwrap(), "true");
    }

    #[test]
    fn test_date_within_last_year() {
        let registry = GeneratorRegistry::new();
        let today = chrono::Local::now().date_naive();
        for _ in 0..50 {
            let value = registry.generate("date", &[]).unwrap();
            let parsed = chrono::NaiveDate::parse_from_str(&value, "%Y-%m-%d").unwrap();
            let age = (today - parsed).num_days();
            assert!((0..365).contains(&age), "date {} is {} days old", value, age);
        }
    }

    #[test]
    fn test_catalog_entries_resolve() {
        let registry = GeneratorRegistry::new();
        for info in PLACEHOLDER_CATALOG {
            let inner = info.example.trim_start_matches("{{").trim_end_matches("}}");
            let type_name = inner.split(':').next().unwrap();
            assert!(registry.contains(type_name), "{} not registered", type_name);
        }
    }
}
