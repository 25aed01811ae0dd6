//! Shared data types for the content core.
//! Implemented as newtypes to enforce invariants.

use std::{
    fmt,
    path::{Component, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::well_known::Rfc3339, macros::format_description};

/// Calendar date used for publish and modification times.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, of which only the
/// date part is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoDate(Date);

impl IsoDate {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let fmt = format_description!("[year]-[month]-[day]");
        if let Ok(date) = Date::parse(s, &fmt) {
            return Some(Self(date));
        }
        time::OffsetDateTime::parse(s, &Rfc3339)
            .ok()
            .map(|dt| Self(dt.date()))
    }

    pub fn as_str(&self) -> String {
        let fmt = format_description!("[year]-[month]-[day]");
        self.0.format(&fmt).unwrap_or_default()
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl TryFrom<String> for IsoDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid date `{value}`"))
    }
}

impl From<IsoDate> for String {
    fn from(value: IsoDate) -> Self {
        value.as_str()
    }
}

/// Relative paths to content sources, always below the collection root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelPath(PathBuf);

impl RelPath {
    pub fn new(p: PathBuf) -> Option<Self> {
        let escapes = p
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if p.is_absolute() || escapes || p.as_os_str().is_empty() {
            None
        } else {
            Some(Self(p))
        }
    }

    /// Forward-slash joined path without its extension, used as a slug.
    pub fn to_slug(&self) -> String {
        self.0
            .with_extension("")
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Site-absolute link target such as `/posts/hello`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Href(String);

impl Href {
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn new(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    pub fn post(slug: &str) -> Self {
        Self::new(&format!("posts/{slug}"))
    }

    pub fn tag(tag_slug: &str) -> Self {
        Self::new(&format!("tags/{tag_slug}"))
    }

    pub fn project(id: &str) -> Self {
        Self::new(&format!("projects/{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! icons {
    ($($name:ident),+ $(,)?) => {
        /// Icons a post or project may name in its metadata, spelled as in
        /// the lucide icon set (`BookOpen`, `Sparkles`, ...).
        ///
        /// Only the names listed here are accepted. Unknown names are rejected
        /// when content is loaded rather than resolved at render time; add a
        /// variant here before using a new icon in content.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum Icon {
            #[default]
            Newspaper,
            $($name),+
        }

        impl Icon {
            pub const ALL: &'static [Icon] = &[Icon::Newspaper, $(Icon::$name),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    Icon::Newspaper => "Newspaper",
                    $(Icon::$name => stringify!($name)),+
                }
            }
        }
    };
}

icons![
    BookOpen,
    Brain,
    Briefcase,
    Calendar,
    Camera,
    Cloud,
    Code,
    Coffee,
    Compass,
    Cpu,
    Database,
    FileText,
    Flame,
    GitBranch,
    Github,
    Globe,
    GraduationCap,
    Heart,
    Keyboard,
    Layers,
    Lightbulb,
    Lock,
    Music,
    Package,
    Palette,
    PenTool,
    Rocket,
    Server,
    Settings,
    Shield,
    Sparkles,
    Star,
    Terminal,
    Wrench,
    Zap,
];

impl FromStr for Icon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str() == s.trim())
            .ok_or_else(|| format!("unknown icon `{s}`"))
    }
}

impl TryFrom<String> for Icon {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Icon> for &'static str {
    fn from(value: Icon) -> Self {
        value.as_str()
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
