use crate::document::Document;
use std::ffi::OsString;

/// Layout handed to pandoc's LaTeX template.
///
/// Margins follow the usual thesis convention: a 1.5 inch binding margin on the
/// left and 1 inch everywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct PandocLayout {
    /// LaTeX engine; xelatex is needed for system fonts like Times New Roman
    pub pdf_engine: String,
    pub document_class: String,
    pub paper_size: String,
    pub margin_top_cm: f32,
    pub margin_bottom_cm: f32,
    /// Binding side
    pub margin_left_cm: f32,
    pub margin_right_cm: f32,
    pub font_size_pt: u32,
    pub main_font: String,
    pub line_stretch: f32,
    pub link_color: String,
    /// Deepest heading level listed in the table of contents
    pub toc_depth: u8,
    pub number_sections: bool,
    pub highlight_style: String,
}

impl Default for PandocLayout {
    fn default() -> Self {
        PandocLayout {
            pdf_engine: "xelatex".to_string(),
            document_class: "report".to_string(),
            paper_size: "a4".to_string(),
            margin_top_cm: 2.54,
            margin_bottom_cm: 2.54,
            margin_left_cm: 3.81,
            margin_right_cm: 2.54,
            font_size_pt: 12,
            main_font: "Times New Roman".to_string(),
            line_stretch: 1.5,
            link_color: "blue".to_string(),
            toc_depth: 3,
            number_sections: true,
            highlight_style: "tango".to_string(),
        }
    }
}

impl PandocLayout {
    fn geometry(&self) -> String {
        format!(
            "geometry:top={:.2}cm, bottom={:.2}cm, left={:.2}cm, right={:.2}cm",
            self.margin_top_cm, self.margin_bottom_cm, self.margin_left_cm, self.margin_right_cm
        )
    }

    /// The full pandoc argument list for `document`, relative to its directory.
    pub fn args(&self, document: &Document) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            document.input.clone().into(),
            "-o".into(),
            document.output.clone().into(),
            format!("--pdf-engine={}", self.pdf_engine).into(),
            "--toc".into(),
            format!("--toc-depth={}", self.toc_depth).into(),
        ];
        if self.number_sections {
            args.push("--number-sections".into());
        }

        let variables = [
            format!("documentclass={}", self.document_class),
            format!("papersize={}", self.paper_size),
            self.geometry(),
            format!("fontsize={}pt", self.font_size_pt),
            format!("mainfont={}", self.main_font),
            format!("linestretch={}", self.line_stretch),
            "colorlinks=true".to_string(),
            format!("linkcolor={}", self.link_color),
        ];
        for variable in variables {
            args.push("-V".into());
            args.push(variable.into());
        }

        args.push(format!("--highlight-style={}", self.highlight_style).into());
        args.push("--metadata".into());
        args.push(format!("title={}", document.title).into());
        args.push("--metadata".into());
        args.push(format!("date={}", document.date).into());

        args
    }
}
