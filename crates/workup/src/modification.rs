use std::borrow::Cow;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Modification annotations written by PEAKS into de novo sequences
pub const OXIDATION: &str = "(+15.99)";
pub const CARBAMIDOMETHYL: &str = "(+57.02)";
pub const DEAMIDATION: &str = "(+.98)";

/// A literal modification annotation to be deleted from sequences
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Common name of the modification, if known
    pub fn name(&self) -> Option<&'static str> {
        match self.0.as_str() {
            OXIDATION => Some("Oxidation"),
            CARBAMIDOMETHYL => Some("Carbamidomethyl"),
            DEAMIDATION => Some("Deamidation"),
            _ => None,
        }
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.chars().any(|c| c == '\n' || c == '\r') {
            return Err(Error::InvalidTag(s.into()));
        }
        Ok(Tag(s.into()))
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> String {
        tag.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn default_tags() -> Vec<Tag> {
    [OXIDATION, CARBAMIDOMETHYL, DEAMIDATION]
        .into_iter()
        .map(|s| Tag(s.into()))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub removed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemovalSummary {
    pub lines: usize,
    pub modified_lines: usize,
    pub tags: Vec<TagCount>,
    /// Groups removed by the catch-all pattern, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<usize>,
}

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)").expect("static regex"));

/// What a single removal step deleted: the tag at an index of the set, or
/// groups matched by the catch-all pattern
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Removed {
    Tag(usize),
    Other,
}

/// Ordered set of tags, removed one after another from every line
#[derive(Clone, Debug)]
pub struct TagSet {
    tags: Vec<Tag>,
    strip_all: bool,
}

impl Default for TagSet {
    fn default() -> Self {
        TagSet::new(default_tags())
    }
}

impl TagSet {
    pub fn new(tags: Vec<Tag>) -> Self {
        TagSet {
            tags,
            strip_all: false,
        }
    }

    /// After the literal tags, also delete any remaining parenthesised group
    pub fn strip_all(mut self, enable: bool) -> Self {
        self.strip_all = enable;
        self
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Apply every removal step in order, reporting each non-empty step to
    /// `removed`. An earlier removal can expose a later tag.
    fn apply<'a, F>(&self, line: &'a str, mut removed: F) -> Cow<'a, str>
    where
        F: FnMut(Removed, usize),
    {
        let mut line = Cow::Borrowed(line);
        for (ix, tag) in self.tags.iter().enumerate() {
            let n = line.matches(tag.as_str()).count();
            if n > 0 {
                removed(Removed::Tag(ix), n);
                line = Cow::Owned(line.replace(tag.as_str(), ""));
            }
        }
        if self.strip_all {
            // Nested groups unwrap one level per pass
            while ANNOTATION.is_match(&line) {
                removed(Removed::Other, ANNOTATION.find_iter(&line).count());
                line = Cow::Owned(ANNOTATION.replace_all(&line, "").into_owned());
            }
        }
        line
    }

    pub fn clean<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.apply(line, |_, _| {})
    }

    /// Clean every line of `rdr` into `wtr`, preserving line order, line
    /// count and line terminators
    pub fn remove<R: BufRead, W: Write>(
        &self,
        rdr: R,
        mut wtr: W,
    ) -> Result<RemovalSummary, Error> {
        let mut summary = RemovalSummary {
            tags: self
                .tags
                .iter()
                .map(|tag| TagCount {
                    tag: tag.to_string(),
                    name: tag.name(),
                    removed: 0,
                })
                .collect(),
            other: self.strip_all.then_some(0),
            ..Default::default()
        };

        crate::for_each_line(rdr, |line, terminator| {
            summary.lines += 1;
            let cleaned = self.apply(line, |step, n| match step {
                Removed::Tag(ix) => summary.tags[ix].removed += n,
                Removed::Other => *summary.other.get_or_insert(0) += n,
            });
            if cleaned != line {
                summary.modified_lines += 1;
            }
            wtr.write_all(cleaned.as_bytes())?;
            wtr.write_all(terminator.as_bytes())?;
            Ok(())
        })?;
        wtr.flush()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn remove_known_tags() {
        let tags = TagSet::default();
        assert_eq!(tags.clean("ACDE(+15.99)FGHI(+57.02)K"), "ACDEFGHIK");
        assert_eq!(tags.clean("MNO(+.98)PQR"), "MNOPQR");
        assert_eq!(
            tags.clean("N(+.98)M(+15.99)C(+57.02)M(+15.99)K"),
            "NMCMK"
        );
        assert!(matches!(tags.clean("PEPTIDEK"), Cow::Borrowed("PEPTIDEK")));
    }

    #[test]
    fn other_characters_untouched() {
        let tags = TagSet::default();
        // unknown modifications and near misses are left in place
        assert_eq!(tags.clean("S(+79.97)PEK(+15.99)"), "S(+79.97)PEK");
        assert_eq!(tags.clean("M(+15.9)K(+0.98)"), "M(+15.9)K(+0.98)");
        assert_eq!(tags.clean("(+X98)"), "(+X98)");
    }

    #[test]
    fn idempotent() {
        let tags = TagSet::default();
        for line in [
            "ACDE(+15.99)FGHI(+57.02)K",
            "MNO(+.98)PQR",
            "Q(+.98)(+15.99)",
            "LLSLSSLK",
        ] {
            let once = tags.clean(line).into_owned();
            assert_eq!(tags.clean(&once), once);
        }
    }

    #[test]
    fn strip_all_annotations() {
        let tags = TagSet::default().strip_all(true);
        assert_eq!(tags.clean("S(+79.97)PEK(+15.99)"), "SPEK");
        assert_eq!(tags.clean("A(B(C)D)E"), "AE");
        assert_eq!(tags.clean("PEPTIDE"), "PEPTIDE");
    }

    #[test]
    fn remove_stream() {
        let input = "ACDE(+15.99)FGHI(+57.02)K\nMNO(+.98)PQR\nLLSLSSLK\n\nM(+15.99)M(+15.99)K\n";
        let mut out = Vec::new();
        let summary = TagSet::default().remove(input.as_bytes(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ACDEFGHIK\nMNOPQR\nLLSLSSLK\n\nMMK\n"
        );
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.modified_lines, 3);
        let removed = summary.tags.iter().map(|t| t.removed).collect::<Vec<_>>();
        assert_eq!(removed, vec![3, 1, 1]);
        assert_eq!(summary.tags[0].name, Some("Oxidation"));
        assert_eq!(summary.other, None);
    }

    #[test]
    fn tag_order_matters() {
        // `(+15.99)` only appears once `X` has been removed
        let tags = TagSet::new(vec!["X".parse().unwrap(), OXIDATION.parse().unwrap()]);
        assert_eq!(tags.clean("M(+15.X99)K"), "MK");
    }

    #[test]
    fn invalid_tags() {
        assert!("".parse::<Tag>().is_err());
        assert!("(+1)\n".parse::<Tag>().is_err());
        let tags: Vec<Tag> = serde_json::from_str(r#"["(+15.99)", "(+42.01)"]"#).unwrap();
        assert_eq!(tags[1].as_str(), "(+42.01)");
        assert_eq!(tags[1].name(), None);
        assert!(serde_json::from_str::<Vec<Tag>>(r#"[""]"#).is_err());
    }

    #[test]
    fn remove_keeps_terminators() {
        let mut out = Vec::new();
        let summary = TagSet::default()
            .remove("AB(+15.99)C\r\nDE".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ABC\r\nDE");
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.modified_lines, 1);
    }

    #[test]
    fn clean_and_remove_agree() {
        let tags = TagSet::default().strip_all(true);
        let lines = ["S(+79.97)PEK(+15.99)", "A(B(C)D)E", "C(+57.02)C(+57.02)K", "PEPTIDE"];
        let mut out = Vec::new();
        let summary = tags.remove(lines.join("\n").as_bytes(), &mut out).unwrap();
        let expected = lines.iter().map(|l| tags.clean(l)).collect::<Vec<_>>().join("\n");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        let removed = summary.tags.iter().map(|t| t.removed).collect::<Vec<_>>();
        assert_eq!(removed, vec![1, 2, 0]);
        assert_eq!(summary.other, Some(3));
        assert_eq!(summary.modified_lines, 3);
    }
}
