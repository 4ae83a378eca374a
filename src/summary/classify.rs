use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

/// Executables counted as productive work unless their window titles say
/// otherwise. Matching is lower-cased substring containment, so "idea" also
/// catches "idea64.exe".
const PRODUCTIVE_EXES: &[&str] = &[
    "code.exe",
    "pycharm",
    "idea",
    "webstorm",
    "goland",
    "clion",
    "word",
    "excel",
    "powerpnt",
    "outlook",
    "chrome.exe",
    "firefox.exe",
    "msedge.exe",
    "safari",
    "cmd.exe",
    "powershell.exe",
    "terminal",
    "wt.exe",
    "explorer.exe",
    "photoshop",
    "illustrator",
    "figma",
    "xd",
    "blender",
    "unity",
    "docker",
    "virtualbox",
    "vmware",
    "gitkraken",
    "postman",
    "obsidian",
];

const DISTRACTION_EXES: &[&str] = &[
    "steam.exe",
    "epicgameslauncher",
    "origin.exe",
    "gog galaxy",
    "spotify.exe",
    "discord.exe",
    "slack.exe",
    "netflix",
    "hulu",
    "disneyplus",
    "whatsapp",
    "telegram",
    "signal",
];

/// Title keywords that reclassify an otherwise productive app. A browser on
/// youtube is a distraction no matter how productive the browser is.
const DISTRACTION_TITLE_KEYWORDS: &[&str] = &[
    "youtube",
    "facebook",
    "twitter",
    "reddit",
    "netflix",
    "hulu",
    "twitch",
    "instagram",
    "9gag",
    "game",
    "play",
    "tiktok",
    "pinterest",
];

const MEETING_EXES: &[&str] = &["teams.exe", "zoom.exe", "webex", "skype.exe", "slack.exe"];

const MEETING_TITLE_KEYWORDS: &[&str] = &[
    "meet",
    "meeting",
    "call",
    "webinar",
    "huddle",
    "zoom meeting",
    "microsoft teams meeting",
    "google meet",
];

/// Tokens too common in OCR output to be worth keeping as keywords.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "http", "https", "com", "www", "org", "net",
    "gov", "edu", "from", "not", "are", "was", "were", "has", "had", "but", "you", "your", "all",
    "its", "use", "can", "will", "new", "set", "get", "app", "exe", "error", "warning", "info",
    "debug", "trace", "file", "line", "src", "img", "div", "span", "class", "could", "would",
    "should", "which", "what", "when", "where", "who", "rem", "px", "em", "css", "html",
    "javascript", "python",
];

/// Words of 4+ alphanumeric/underscore characters that start with a letter or
/// underscore. Compiled once; a broken pattern degrades to "no keywords"
/// instead of failing the summary.
static KEYWORD_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]{3,}\b").ok());

/// The keyword tables driving classification. Injected into [Classifier] as
/// plain data so tests can substitute their own sets.
#[derive(Debug, Clone)]
pub struct KeywordTables {
    pub productive_exes: Vec<String>,
    pub distraction_exes: Vec<String>,
    pub distraction_title_keywords: Vec<String>,
    pub meeting_exes: Vec<String>,
    pub meeting_title_keywords: Vec<String>,
    pub stop_words: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            productive_exes: owned(PRODUCTIVE_EXES),
            distraction_exes: owned(DISTRACTION_EXES),
            distraction_title_keywords: owned(DISTRACTION_TITLE_KEYWORDS),
            meeting_exes: owned(MEETING_EXES),
            meeting_title_keywords: owned(MEETING_TITLE_KEYWORDS),
            stop_words: owned(STOP_WORDS),
        }
    }
}

/// Stateless app/window classification over [KeywordTables].
///
/// `is_productive` and `is_distraction` are mutually exclusive for any input:
/// a distraction title keyword simultaneously disqualifies the productive
/// branch and enables the distraction one.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tables: KeywordTables,
}

impl Classifier {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    fn contains_any(haystack: &str, keywords: &[String]) -> bool {
        keywords.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Whether an app looks productive, judged over the app's whole title set
    /// for the day.
    pub fn is_productive(&self, exe_path: &str, titles: &[String]) -> bool {
        let exe = exe_path.to_lowercase();
        let titles = titles.join(" ").to_lowercase();
        Self::contains_any(&exe, &self.tables.productive_exes)
            && !Self::contains_any(&titles, &self.tables.distraction_title_keywords)
    }

    /// Whether an app looks like a distraction, judged over the app's whole
    /// title set for the day.
    pub fn is_distraction(&self, exe_path: &str, titles: &[String]) -> bool {
        let exe = exe_path.to_lowercase();
        let titles = titles.join(" ").to_lowercase();
        Self::contains_any(&exe, &self.tables.distraction_exes)
            || (Self::contains_any(&exe, &self.tables.productive_exes)
                && Self::contains_any(&titles, &self.tables.distraction_title_keywords))
    }

    /// Whether a single record looks like meeting time. Unlike the two
    /// functions above this is evaluated per record, with that record's title.
    pub fn is_meeting(&self, exe_path: &str, title: &str) -> bool {
        let exe = exe_path.to_lowercase();
        let title = title.to_lowercase();
        Self::contains_any(&exe, &self.tables.meeting_exes)
            || Self::contains_any(&title, &self.tables.meeting_title_keywords)
    }

    /// Extracts sorted unique keywords from a blob of OCR text. Empty input
    /// or tokenizer trouble yields an empty list; keywords are diagnostic
    /// data and must never fail a summary.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }
        let Some(token) = KEYWORD_TOKEN.as_ref() else {
            return vec![];
        };
        let lowered = text.to_lowercase();
        let words: BTreeSet<&str> = token
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| !self.tables.stop_words.iter().any(|s| s == w))
            .collect();
        words.into_iter().map(|w| w.to_string()).collect()
    }
}
