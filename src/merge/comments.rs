//! コメントの除去。`//go:` などのディレクティブは意味を持つので残す

use crate::ast::visit::VisitorMut;
use crate::ast::{Comment, File};

#[derive(Debug, Default)]
pub struct CommentStripper {
    removed: usize,
}

impl CommentStripper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl VisitorMut for CommentStripper {
    fn visit_comment_group(&mut self, group: &mut Vec<Comment>) {
        let before = group.len();
        group.retain(Comment::is_directive);
        self.removed += before - group.len();
    }

    fn visit_line_comment(&mut self, comment: &mut Option<Comment>) {
        if comment.as_ref().is_some_and(|c| !c.is_directive()) {
            *comment = None;
            self.removed += 1;
        }
    }
}

/// ファイルからコメントを取り除き、除いた数を返す
pub fn strip_comments(file: &mut File) -> usize {
    let mut stripper = CommentStripper::new();
    stripper.visit_file(file);
    stripper.removed()
}
