//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use syndex_core::Bookmark;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a newly added bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("Title:       {}", bookmark.title.as_deref().unwrap_or("-"));
                println!("Link:        {}", bookmark.link);
                if let Some(desc) = bookmark.description.as_deref() {
                    println!("Description: {}", truncate(desc, 60));
                }
                println!("Published:   {}", bookmark.pub_date);
            }
            OutputFormat::Json => match serde_json::to_string_pretty(bookmark) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to encode bookmark: {}", e),
            },
            OutputFormat::Quiet => {
                println!("{}", bookmark.pub_date);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syndex_core::FieldValue;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_bookmark_json_shape() {
        let bookmark = Bookmark {
            title: FieldValue::Unspecified,
            link: "https://example.com".to_string(),
            pub_date: "Sat, 09 Mar 2024 10:00:00 +0000".to_string(),
            description: FieldValue::Present("notes".to_string()),
        };

        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": null,
                "link": "https://example.com",
                "pubDate": "Sat, 09 Mar 2024 10:00:00 +0000",
                "description": "notes"
            })
        );
    }
}
