//! CSS for the HTML route.
//!
//! The stylesheet approximates the pandoc/xelatex layout so both routes give
//! a submission-ready document:
//!
//! - A4 pages with a wide binding margin on the left and a centred page number
//! - Times New Roman body text at 12pt with 1.5 line spacing
//! - Chapter-style `h1` headings that always start a new page
//! - Blue-headed, zebra-striped tables and boxed code blocks

/// Colours shared across the stylesheet.
struct Palette {
    text: &'static str,
    accent: &'static str,
    muted: &'static str,
    rule: &'static str,
    stripe: &'static str,
    code_bg: &'static str,
}

const PALETTE: Palette = Palette {
    text: "#1f2937",
    accent: "#1e40af",
    muted: "#64748b",
    rule: "#cbd5e1",
    stripe: "#f8fafc",
    code_bg: "#f1f5f9",
};

const BODY_FONT: &str = "'Times New Roman', serif";
const CODE_FONT: &str = "'Courier New', monospace";

/// Generate the complete stylesheet handed to the renderer.
pub fn generate_stylesheet() -> String {
    let mut css = String::with_capacity(4096);

    css.push_str(&generate_page_rules());
    css.push_str(&generate_base_styles());

    css.push_str("\n/* Tables */\n");
    css.push_str(&generate_table_styles());

    css.push_str("\n/* Code */\n");
    css.push_str(&generate_code_styles());

    css.push_str("\n/* Table of contents */\n");
    css.push_str(&generate_toc_styles());

    css
}

/// Page box: size, margins (top right bottom left) and the folio.
fn generate_page_rules() -> String {
    format!(
        r#"@page {{
    size: A4;
    margin: 2.54cm 2.54cm 2.54cm 3.81cm;
    @bottom-center {{
        content: counter(page);
        font-family: {BODY_FONT};
        font-size: 12pt;
    }}
}}
"#
    )
}

fn generate_base_styles() -> String {
    let Palette {
        text,
        accent,
        muted,
        ..
    } = PALETTE;

    format!(
        r#"
body {{
    font-family: {BODY_FONT};
    font-size: 12pt;
    line-height: 1.5;
    color: {text};
    text-align: justify;
}}

h1 {{
    font-size: 16pt;
    font-weight: bold;
    color: {accent};
    text-transform: uppercase;
    page-break-before: always;
    border-bottom: 2px solid {accent};
    padding-bottom: 8px;
}}

h1:first-of-type {{
    page-break-before: avoid;
}}

h2 {{
    font-size: 14pt;
    font-weight: bold;
    color: {accent};
    margin-top: 18pt;
}}

h3 {{
    font-size: 12pt;
    font-weight: bold;
    color: {muted};
}}
"#
    )
}

fn generate_table_styles() -> String {
    let Palette {
        accent,
        rule,
        stripe,
        ..
    } = PALETTE;

    format!(
        r#"table {{
    width: 100%;
    border-collapse: collapse;
    margin: 12pt 0;
}}

th {{
    background-color: {accent};
    color: white;
    padding: 8px;
    text-align: left;
}}

td {{
    padding: 8px;
    border: 1px solid {rule};
}}

tr:nth-child(even) {{
    background-color: {stripe};
}}
"#
    )
}

fn generate_code_styles() -> String {
    let Palette { rule, code_bg, .. } = PALETTE;

    format!(
        r#"code {{
    font-family: {CODE_FONT};
    background-color: {code_bg};
    padding: 2px 4px;
    border-radius: 3px;
}}

pre {{
    background-color: {code_bg};
    border: 1px solid {rule};
    padding: 12px;
    overflow-x: auto;
    font-size: 10pt;
}}

pre code {{
    padding: 0;
    background-color: transparent;
}}
"#
    )
}

fn generate_toc_styles() -> String {
    let Palette { text, .. } = PALETTE;

    format!(
        r#".toc ul {{
    list-style-type: none;
    padding-left: 1em;
}}

.toc li {{
    margin: 0.3em 0;
}}

.toc a {{
    text-decoration: none;
    color: {text};
}}
"#
    )
}
