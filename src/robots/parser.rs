//! Robots.txt parser implementation
//!
//! Only the wildcard user-agent is considered, and only lines that start with
//! exactly `Allow: ` or `Disallow: ` are recognized. There is no longest-match
//! precedence and no crawl-delay support.

/// Marker of the block that applies to every crawler
const WILDCARD_AGENT: &str = "User-agent: *";

/// Marker that starts every user-agent block
const AGENT_MARKER: &str = "User-agent";

/// Separator between a directive and its value
const DIRECTIVE_SEPARATOR: &str = ": ";

/// Structured robots.txt policy for the wildcard user-agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// Whether any wildcard directives were found (and no full-access override)
    pub restricted: bool,

    /// Allow patterns in file order
    pub allowed: Vec<String>,

    /// Disallow patterns in file order
    pub disallowed: Vec<String>,
}

impl RobotsPolicy {
    /// Creates a policy with no restrictions and no patterns
    ///
    /// This is used when there is no wildcard block, when the block grants
    /// full access, and when robots.txt cannot be fetched.
    pub fn unrestricted() -> Self {
        Self::default()
    }
}

/// Parses raw robots.txt text into a policy for the wildcard user-agent
///
/// # Algorithm
///
/// 1. Without any `User-agent: *` the text yields an unrestricted policy.
/// 2. The text is split into blocks at every `User-agent` marker.
/// 3. For each block containing the wildcard marker, every line (minus a
///    trailing `\r`) is split on `": "` and the second field is the value:
///    - `Allow: /` (value exactly `/`) ends parsing with an unrestricted policy
///    - `Allow: <path>` appends the space-trimmed path to the allow list
///    - `Disallow: <path>` appends the space-trimmed path to the disallow list
/// 4. Otherwise the policy is restricted with the collected patterns.
///
/// # Examples
///
/// ```
/// use web_scout::robots::parse_robots;
///
/// let policy = parse_robots("User-agent: *\nDisallow: /private\nAllow: /public");
/// assert!(policy.restricted);
/// assert_eq!(policy.allowed, vec!["/public"]);
/// assert_eq!(policy.disallowed, vec!["/private"]);
/// ```
pub fn parse_robots(text: &str) -> RobotsPolicy {
    if !text.contains(WILDCARD_AGENT) {
        return RobotsPolicy::unrestricted();
    }

    let block_starts: Vec<usize> = text
        .match_indices(AGENT_MARKER)
        .map(|(index, _)| index)
        .collect();

    let mut allowed = Vec::new();
    let mut disallowed = Vec::new();

    for (i, &start) in block_starts.iter().enumerate() {
        let end = block_starts.get(i + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];

        if !block.contains(WILDCARD_AGENT) {
            continue;
        }

        for line in block.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);

            // Only the field between the first and second separator is the value
            let mut fields = line.split(DIRECTIVE_SEPARATOR);
            let (Some(directive), Some(value)) = (fields.next(), fields.next()) else {
                continue;
            };

            match directive {
                "Allow" if value == "/" => return RobotsPolicy::unrestricted(),
                "Allow" => allowed.push(value.trim_matches(' ').to_string()),
                "Disallow" => disallowed.push(value.trim_matches(' ').to_string()),
                _ => {}
            }
        }
    }

    RobotsPolicy {
        restricted: true,
        allowed,
        disallowed,
    }
}
