use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of languages the assistant knows how to prompt for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Cpp,
    Java,
    C,
    Html,
    Css,
}

impl Language {
    /// Name used in prompt text and editor-facing labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::C => "c",
            Language::Html => "html",
            Language::Css => "css",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "js" | "jsx" | "mjs" => Some(Language::Javascript),
            "cpp" | "cc" | "cxx" | "hpp" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "c" | "h" => Some(Language::C),
            "html" | "htm" => Some(Language::Html),
            "css" => Some(Language::Css),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::Javascript),
            "cpp" | "c++" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "html" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            other => Err(format!(
                "unknown language '{}' (expected one of: python, javascript, cpp, java, c, html, css)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("JavaScript".parse::<Language>().unwrap(), Language::Javascript);
        assert!("rust".parse::<Language>().is_err());
    }

    #[test]
    fn infers_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("jsx"), Some(Language::Javascript));
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn displays_lowercase_for_prompts() {
        assert_eq!(Language::Cpp.to_string(), "cpp");
        assert_eq!(Language::Html.to_string(), "html");
    }
}
