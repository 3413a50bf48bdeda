//! Comments recorded in a descriptor's `source_code_info`.
//!
//! Locations are addressed by the field-number path from the
//! `FileDescriptorProto` root, e.g. `[4, 0, 2, 1]` is the second field of the
//! first message.

use std::collections::HashMap;

use prost_types::{SourceCodeInfo, source_code_info::Location};

pub(crate) const FILE_MESSAGE: i32 = 4;
pub(crate) const FILE_ENUM: i32 = 5;
pub(crate) const MESSAGE_FIELD: i32 = 2;
pub(crate) const MESSAGE_NESTED: i32 = 3;
pub(crate) const MESSAGE_ENUM: i32 = 4;
pub(crate) const ENUM_VALUE: i32 = 2;

#[derive(Debug, Default)]
pub(crate) struct CommentIndex {
    by_path: HashMap<Vec<i32>, Vec<String>>,
}

impl CommentIndex {
    pub fn new(info: Option<&SourceCodeInfo>) -> Self {
        let mut by_path = HashMap::new();
        for location in info.map(|i| i.location.as_slice()).unwrap_or_default() {
            let lines = comment_lines(location);
            if !lines.is_empty() {
                by_path.insert(location.path.clone(), lines);
            }
        }
        Self { by_path }
    }

    /// Leading then trailing comment lines for `path`.
    pub fn get(&self, path: &[i32]) -> Vec<String> {
        self.by_path.get(path).cloned().unwrap_or_default()
    }
}

fn comment_lines(location: &Location) -> Vec<String> {
    [&location.leading_comments, &location.trailing_comments]
        .into_iter()
        .flatten()
        .flat_map(|text| split_comment(text))
        .collect()
}

/// protoc keeps the space after `//` and a final newline; drop both.
fn split_comment(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|l| l.strip_prefix(' ').unwrap_or(l).trim_end().to_string())
        .collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Build a `Location` carrying `lines` as its leading comment.
pub(crate) fn location(path: Vec<i32>, lines: &[String]) -> Location {
    let leading = lines.iter().map(|l| format!(" {l}\n")).collect::<String>();
    Location {
        path,
        span: vec![0, 0, 0],
        leading_comments: Some(leading),
        ..Default::default()
    }
}

pub(crate) fn child(path: &[i32], kind: i32, index: usize) -> Vec<i32> {
    let mut out = path.to_vec();
    out.push(kind);
    out.push(index as i32);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_and_trailing_are_joined() {
        let info = SourceCodeInfo {
            location: vec![Location {
                path: vec![4, 0, 2, 0],
                leading_comments: Some(" first\n second\n".to_string()),
                trailing_comments: Some(" MyInt - Example trailing Comment\n".to_string()),
                ..Default::default()
            }],
        };
        let index = CommentIndex::new(Some(&info));
        assert_eq!(
            index.get(&[4, 0, 2, 0]),
            vec!["first", "second", "MyInt - Example trailing Comment"]
        );
        assert!(index.get(&[4, 0]).is_empty());
    }

    #[test]
    fn written_location_reads_back() {
        let lines = vec!["a".to_string(), String::new(), "b".to_string()];
        let info = SourceCodeInfo {
            location: vec![location(vec![5, 1], &lines)],
        };
        assert_eq!(CommentIndex::new(Some(&info)).get(&[5, 1]), lines);
    }
}
