//! 行とセルのバッファ
//!
//! 出力は行ごとに「セル」の並びとして溜めておき、最後にまとめて桁を揃える。
//! 最後のセル以外は区切られたセルで、同じインデントの連続した行で同じ列に
//! 区切られたセルがあれば、その列の幅を揃える（`text/tabwriter` の
//! minwidth 0、padding 1、空列の破棄と同じ規則）。

/// 出力1行分
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct Line {
    pub indent: usize,
    pub cells: Vec<String>,
    /// 複数行にまたがる生文字列やコメントの続きの行。インデントも桁揃えもしない
    pub raw: bool,
    /// 行末に生文字列の中身が続くので、末尾の空白を削らない
    pub keep_trailing: bool,
    /// 直前の行と桁揃えを共有しない
    pub section: bool,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }

    /// 区切られたセルの数
    fn terminated(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    fn aligns_at(&self, column: usize) -> bool {
        !self.raw && column < self.terminated()
    }
}

#[derive(Debug, Default)]
pub(super) struct TabWriter {
    lines: Vec<Line>,
    current: Option<Line>,
    indent: usize,
    pending_section: bool,
}

impl TabWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// 次に始まる行から新しい桁揃えの区切りにする
    pub fn section(&mut self) {
        match &mut self.current {
            Some(line) if line.is_empty() => line.section = true,
            Some(_) => {}
            None => self.pending_section = true,
        }
    }

    /// 現在のセルにテキストを追加する。改行を含む場合は続きを生の行にする
    pub fn write(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.current_cell().push_str(first);
        }
        for part in parts {
            if let Some(mut line) = self.current.take() {
                line.keep_trailing = true;
                self.lines.push(line);
            }
            self.current = Some(Line {
                indent: 0,
                cells: vec![part.to_string()],
                raw: true,
                keep_trailing: false,
                section: false,
            });
        }
    }

    /// 現在のセルを閉じて次のセルを始める
    pub fn cell(&mut self) {
        self.line().cells.push(String::new());
    }

    /// 現在の行を終える。行が始まっていなければ空行を出力する
    pub fn newline(&mut self) {
        let line = self.current.take().unwrap_or_default();
        self.lines.push(line);
    }

    /// 行の途中なら改行する
    pub fn ensure_newline(&mut self) {
        if let Some(line) = self.current.take() {
            self.lines.push(line);
        }
    }

    /// 空行を1つだけ入れる（連続した空行にはしない）
    pub fn blank_line(&mut self) {
        self.ensure_newline();
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    /// 書き終えた行の数
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 現在の行の桁位置（インデントを除く）
    pub fn column(&self) -> usize {
        self.current.as_ref().map_or(0, |line| {
            line.cells.iter().map(|cell| cell.chars().count()).sum::<usize>()
                + line.cells.len().saturating_sub(1)
        })
    }

    /// 桁を揃えた最終的なテキスト
    pub fn finish(mut self) -> String {
        self.ensure_newline();
        while self.lines.last().is_some_and(Line::is_empty) {
            self.lines.pop();
        }
        let widths = column_widths(&self.lines);
        let mut out = String::new();
        for (line, widths) in self.lines.iter().zip(&widths) {
            out.push_str(&render_line(line, widths));
            out.push('\n');
        }
        out
    }

    fn line(&mut self) -> &mut Line {
        let indent = self.indent;
        let pending = &mut self.pending_section;
        self.current.get_or_insert_with(|| {
            let section = std::mem::take(pending);
            Line {
                indent,
                cells: vec![String::new()],
                raw: false,
                keep_trailing: false,
                section,
            }
        })
    }

    fn current_cell(&mut self) -> &mut String {
        let line = self.line();
        if line.cells.is_empty() {
            line.cells.push(String::new());
        }
        let last = line.cells.len() - 1;
        &mut line.cells[last]
    }
}

/// 各行の区切られたセルごとの列幅。0 は空列として捨てる
fn column_widths(lines: &[Line]) -> Vec<Vec<usize>> {
    let mut widths: Vec<Vec<usize>> = lines.iter().map(|l| vec![0; l.terminated()]).collect();
    let columns = lines.iter().map(Line::terminated).max().unwrap_or(0);

    for column in 0..columns {
        let mut i = 0;
        while i < lines.len() {
            if !lines[i].aligns_at(column) {
                i += 1;
                continue;
            }
            let start = i;
            let indent = lines[i].indent;
            let mut width = 0;
            let mut all_empty = true;
            while i < lines.len()
                && lines[i].aligns_at(column)
                && lines[i].indent == indent
                && (i == start || !lines[i].section)
            {
                let cell = &lines[i].cells[column];
                if !cell.is_empty() {
                    all_empty = false;
                }
                width = width.max(cell.chars().count() + 1);
                i += 1;
            }
            let width = if all_empty { 0 } else { width };
            for row in &mut widths[start..i] {
                row[column] = width;
            }
        }
    }
    widths
}

fn render_line(line: &Line, widths: &[usize]) -> String {
    if line.raw {
        return line.cells.join(" ");
    }
    if line.is_empty() {
        return String::new();
    }

    let mut text = "\t".repeat(line.indent);
    for (i, cell) in line.cells.iter().enumerate() {
        text.push_str(cell);
        if let Some(&width) = widths.get(i) {
            let used = cell.chars().count();
            if width > used {
                text.push_str(&" ".repeat(width - used));
            }
        }
    }
    if !line.keep_trailing {
        let trimmed = text.trim_end_matches([' ', '\t']).len();
        text.truncate(trimmed);
    }
    text
}
