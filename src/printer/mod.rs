//! Printers: colored text sections, markdown (termimad), JSON.

use owo_colors::OwoColorize;
use termimad::MadSkin;

use ranalysis::catalog::Catalog;
use ranalysis::fields::FieldTable;
use ranalysis::normalize::ResultTable;

pub struct TextPrinter {
    pub color: Option<String>,
}

impl TextPrinter {
    fn paint(&self, text: &str) -> String {
        match self.color.as_deref() {
            Some("green") => text.green().to_string(),
            Some("cyan") => text.cyan().to_string(),
            Some("magenta") => text.magenta().to_string(),
            Some("yellow") => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }

    pub fn print_results(&self, table: &ResultTable) {
        print!("{}", self.render_results(table));
    }

    pub fn render_results(&self, table: &ResultTable) -> String {
        let mut out = String::new();
        for section in table.iter() {
            let header = format!("======== {} ========", section.label);
            out.push_str(&self.paint(&header));
            out.push('\n');
            out.push_str(&section.lines.join("\n"));
            out.push('\n');
        }
        out
    }

    pub fn print_fields(&self, table: &FieldTable) {
        if table.is_empty() {
            println!("(no data)");
            return;
        }
        for field in table.iter() {
            let values: Vec<String> = field.series.scalars().iter().map(|v| v.to_string()).collect();
            println!(
                "{} ({}, {} values): {}",
                self.paint(&field.name),
                field.series.kind(),
                field.series.len(),
                values.join(" ")
            );
        }
    }

    pub fn print_catalog(&self, catalog: &Catalog) {
        if catalog.is_empty() {
            println!("no analyses in {}", catalog.directory().display());
        }
        for analysis in catalog.analyses() {
            println!(
                "{}({})  {}",
                self.paint(analysis.name()),
                analysis.parameters().join(", "),
                analysis.path().display()
            );
        }
        for rejected in catalog.rejected() {
            eprintln!("skipped {}: {}", rejected.path.display(), rejected.error);
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print_results(&self, table: &ResultTable) {
        let mut md = String::new();
        for section in table.iter() {
            md.push_str(&format!("## {}\n\n```\n{}\n```\n\n", section.label, section.lines.join("\n")));
        }
        self.skin.print_text(&md);
        println!();
    }
}
