//! Javadoc archivers: decide which mojo executions produce Javadoc worth
//! recording, and where and under what name it is published.
//!
//! Copying the generated files is done by the host; this module only
//! classifies.

use crate::mojo::MojoInfo;

const JAVADOC_PLUGIN_GROUP: &str = "org.apache.maven.plugins";
const JAVADOC_PLUGIN_ARTIFACT: &str = "maven-javadoc-plugin";

/// Which Javadoc a reporter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavadocArchiver {
    /// Main sources (`javadoc`, `aggregate` goals).
    Main,
    /// Test sources (`test-javadoc`, `test-aggregate` goals).
    Test,
}

/// The project link a recorded Javadoc set is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavadocAction {
    pub title: &'static str,
    pub url_name: &'static str,
    pub icon_name: &'static str,
}

impl JavadocArchiver {
    /// Every archiver, main first.
    pub const ALL: [JavadocArchiver; 2] = [JavadocArchiver::Main, JavadocArchiver::Test];

    /// The archiver that records the output of `mojo`, if any.
    pub fn for_mojo(mojo: &MojoInfo) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.is_javadoc_mojo(mojo))
    }

    fn goals(self) -> [&'static str; 2] {
        match self {
            JavadocArchiver::Main => ["javadoc", "aggregate"],
            JavadocArchiver::Test => ["test-javadoc", "test-aggregate"],
        }
    }

    /// Whether `mojo` is a Javadoc generation this archiver records.
    pub fn is_javadoc_mojo(self, mojo: &MojoInfo) -> bool {
        self.goals()
            .iter()
            .any(|goal| mojo.is(JAVADOC_PLUGIN_GROUP, JAVADOC_PLUGIN_ARTIFACT, goal))
    }

    /// Directory, relative to the build's archive root, the Javadoc is copied to.
    pub fn archive_target_path(self) -> &'static str {
        match self {
            JavadocArchiver::Main => "javadoc",
            JavadocArchiver::Test => "test-javadoc",
        }
    }

    /// Name of the reporter as shown in build configuration.
    pub fn display_name(self) -> &'static str {
        match self {
            JavadocArchiver::Main => "Publish javadoc",
            JavadocArchiver::Test => "Publish test javadoc",
        }
    }

    /// The link shown on the project page.
    pub fn project_action(self) -> JavadocAction {
        match self {
            JavadocArchiver::Main => JavadocAction {
                title: "Javadoc",
                url_name: "javadoc",
                icon_name: "help.png",
            },
            JavadocArchiver::Test => JavadocAction {
                title: "Test Javadoc",
                url_name: "test-javadoc",
                icon_name: "help.png",
            },
        }
    }
}
