//! Identification of executed Maven mojos.

use std::fmt;
use std::str::FromStr;

/// A Maven plugin goal execution, identified by `group:artifact:goal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MojoInfo {
    pub group_id: String,
    pub artifact_id: String,
    pub goal: String,
}

impl MojoInfo {
    /// A mojo from its plugin coordinates and goal.
    pub fn new(group_id: &str, artifact_id: &str, goal: &str) -> Self {
        Self {
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            goal: goal.to_owned(),
        }
    }

    /// Whether this is the given goal of the given plugin.
    pub fn is(&self, group_id: &str, artifact_id: &str, goal: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id && self.goal == goal
    }
}

impl fmt::Display for MojoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.goal)
    }
}

impl FromStr for MojoInfo {
    type Err = MojoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group_id, artifact_id, goal]
                if !group_id.is_empty() && !artifact_id.is_empty() && !goal.is_empty() =>
            {
                Ok(Self::new(group_id, artifact_id, goal))
            }
            _ => Err(MojoParseError {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid mojo \"{input}\": expected groupId:artifactId:goal")]
pub struct MojoParseError {
    pub input: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_mojo() {
        let mojo: MojoInfo = "org.apache.maven.plugins:maven-javadoc-plugin:javadoc"
            .parse()
            .unwrap();
        assert!(mojo.is("org.apache.maven.plugins", "maven-javadoc-plugin", "javadoc"));
        assert!(!mojo.is("org.apache.maven.plugins", "maven-javadoc-plugin", "aggregate"));
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!("a:b".parse::<MojoInfo>().is_err());
        assert!("a:b:c:d".parse::<MojoInfo>().is_err());
        assert!("a::c".parse::<MojoInfo>().is_err());
        assert!("".parse::<MojoInfo>().is_err());
    }

    #[test]
    fn parse_error_names_input() {
        let err = "nope".parse::<MojoInfo>().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn display_matches_parse_format() {
        let mojo = MojoInfo::new("g", "a", "goal");
        assert_eq!(mojo.to_string(), "g:a:goal");
        assert_eq!(mojo.to_string().parse::<MojoInfo>().unwrap(), mojo);
    }
}
