//! # HTML Serializer
//!
//! Serializes a [`Document`] to a single self-contained HTML page: inline
//! stylesheet sized for A4 printing, no scripts, no external resources
//! apart from logo images. All text is escaped; the output contains only
//! resolved values.
//!
//! The serializer is deterministic: the same tree always yields the same
//! bytes.

use crate::tree::{Bloc, Champ, Document, EnTete, Logo, Section, Tableau};

const STYLE: &str = "\
@page { size: A4; margin: 12mm; }
* { box-sizing: border-box; }
body { font-family: Arial, Helvetica, sans-serif; font-size: 10pt; color: #1a1a1a; margin: 0; }
.en-tete { display: flex; justify-content: space-between; align-items: flex-start; gap: 8mm; margin-bottom: 6mm; }
.logo img { max-width: 40mm; max-height: 25mm; }
.logo-substitut { width: 40mm; height: 20mm; border: 1px dashed #888; color: #888; display: flex; align-items: center; justify-content: center; font-weight: bold; }
.titre { text-align: center; flex: 1; }
.titre h1 { font-size: 16pt; margin: 0 0 2mm 0; }
.blocs { display: flex; gap: 6mm; margin-bottom: 4mm; }
.bloc { flex: 1; border: 1px solid #444; padding: 2mm 3mm; }
.bloc h2, .tableau h2 { font-size: 11pt; margin: 0 0 2mm 0; text-transform: uppercase; }
table { width: 100%; border-collapse: collapse; }
.champs th { text-align: left; font-weight: normal; color: #555; width: 40%; padding: 0.5mm 0; }
.champs td { padding: 0.5mm 0; }
.tableau { margin-bottom: 4mm; }
.tableau th, .tableau td { border: 1px solid #444; padding: 1mm 2mm; }
.tableau thead th { background: #e6e6e6; }
td.nombre { text-align: right; white-space: nowrap; }
tr.deduction td { color: #555; }
tr.sous-total td { font-weight: bold; }
tr.total td { font-weight: bold; background: #f0f0f0; }
.remarque { font-style: italic; font-size: 9pt; margin: 1mm 0 0 0; }
.signatures { display: flex; gap: 6mm; margin-top: 8mm; }
.signature { flex: 1; text-align: center; }
.signature .cadre { height: 25mm; border: 1px solid #444; margin-top: 2mm; }
";

/// Serialize a document to HTML.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    out.push_str(&escape(&doc.titre));
    out.push_str("</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    for section in &doc.sections {
        match section {
            Section::EnTete(e) => en_tete(&mut out, e),
            Section::Blocs { blocs } => blocs_html(&mut out, blocs),
            Section::Tableau(t) => tableau(&mut out, t),
            Section::Signatures { roles } => signatures(&mut out, roles),
        }
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text and keep its line breaks (multi-line addresses).
fn escape_lines(s: &str) -> String {
    s.lines().map(escape).collect::<Vec<_>>().join("<br>")
}

fn logo(out: &mut String, l: &Logo) {
    out.push_str("<div class=\"logo\">");
    match l {
        Logo::Image { url } => {
            out.push_str("<img src=\"");
            out.push_str(&escape(url));
            out.push_str("\" alt=\"Logo\">");
        }
        Logo::Substitut { texte } => {
            out.push_str("<div class=\"logo-substitut\">");
            out.push_str(&escape(texte));
            out.push_str("</div>");
        }
    }
    out.push_str("</div>\n");
}

fn champs(out: &mut String, champs: &[Champ]) {
    out.push_str("<table class=\"champs\">\n");
    for c in champs {
        out.push_str("<tr><th>");
        out.push_str(&escape(&c.libelle));
        out.push_str("</th><td>");
        out.push_str(&escape_lines(&c.valeur.afficher()));
        out.push_str("</td></tr>\n");
    }
    out.push_str("</table>\n");
}

fn en_tete(out: &mut String, e: &EnTete) {
    out.push_str("<header class=\"en-tete\">\n");
    logo(out, &e.logo_emetteur);
    out.push_str("<div class=\"emetteur\">\n");
    champs(out, &e.emetteur);
    out.push_str("</div>\n<div class=\"titre\">\n<h1>");
    out.push_str(&escape(&e.titre));
    out.push_str("</h1>\n");
    champs(out, &e.reference);
    out.push_str("</div>\n");
    logo(out, &e.logo_client);
    out.push_str("</header>\n");
}

fn blocs_html(out: &mut String, blocs: &[Bloc]) {
    out.push_str("<section class=\"blocs\">\n");
    for b in blocs {
        out.push_str("<div class=\"bloc\">\n<h2>");
        out.push_str(&escape(&b.titre));
        out.push_str("</h2>\n");
        champs(out, &b.champs);
        out.push_str("</div>\n");
    }
    out.push_str("</section>\n");
}

fn tableau(out: &mut String, t: &Tableau) {
    out.push_str("<section class=\"tableau\">\n<h2>");
    out.push_str(&escape(&t.titre));
    out.push_str("</h2>\n<table>\n<thead><tr>");
    for h in &t.entetes {
        out.push_str("<th>");
        out.push_str(&escape(h));
        out.push_str("</th>");
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for l in &t.lignes {
        out.push_str("<tr class=\"");
        out.push_str(l.style.classe());
        out.push_str("\"><td>");
        out.push_str(&escape(&l.libelle));
        out.push_str("</td>");
        for v in &l.valeurs {
            out.push_str(if v.est_numerique() {
                "<td class=\"nombre\">"
            } else {
                "<td>"
            });
            out.push_str(&escape(&v.afficher()));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    if let Some(r) = &t.remarque {
        out.push_str("<p class=\"remarque\">");
        out.push_str(&escape(r));
        out.push_str("</p>\n");
    }
    out.push_str("</section>\n");
}

fn signatures(out: &mut String, roles: &[String]) {
    out.push_str("<section class=\"signatures\">\n");
    for r in roles {
        out.push_str("<div class=\"signature\"><p>");
        out.push_str(&escape(r));
        out.push_str("</p><div class=\"cadre\"></div></div>\n");
    }
    out.push_str("</section>\n");
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn escaped_text_has_no_markup(s in ".*") {
            let e = escape(&s);
            prop_assert!(!e.contains('<'));
            prop_assert!(!e.contains('>'));
            prop_assert!(!e.contains('"'));
            prop_assert!(!e.contains('\''));
        }

        #[test]
        fn escaped_line_count_preserved(lines in prop::collection::vec("[^\n\r]*", 1..5)) {
            let joined = lines.join("\n");
            prop_assert_eq!(escape_lines(&joined).matches("<br>").count(), joined.lines().count().saturating_sub(1));
        }
    }
}
