//! The upload page.
//!
//! One HTML document with the form, a result panel and the history list.
//! A short inline script posts the form to `/upload` and refreshes the
//! history from `/history`; everything else is static markup.

use crate::config::AppConfig;
use crate::locale::Locale;
use maud::{DOCTYPE, Markup, PreEscaped, html};

struct PageText {
    subtitle: &'static str,
    file_label: &'static str,
    file_hint: &'static str,
    date_label: &'static str,
    date_placeholder: &'static str,
    submit: &'static str,
    history: &'static str,
    empty_history: &'static str,
    preview: &'static str,
    download: &'static str,
    working: &'static str,
}

const TEXT_FR: PageText = PageText {
    subtitle: "Générateur de newsletter",
    file_label: "Fichier Excel",
    file_hint: "Formats acceptés : .xls, .xlsx",
    date_label: "Date de la newsletter (optionnel)",
    date_placeholder: "Ex. : Janvier 2025",
    submit: "Générer la newsletter",
    history: "Historique",
    empty_history: "Aucune newsletter générée pour le moment.",
    preview: "Aperçu",
    download: "Télécharger",
    working: "Génération en cours…",
};

const TEXT_EN: PageText = PageText {
    subtitle: "Newsletter generator",
    file_label: "Excel file",
    file_hint: "Accepted formats: .xls, .xlsx",
    date_label: "Newsletter date (optional)",
    date_placeholder: "e.g. January 2025",
    submit: "Generate newsletter",
    history: "History",
    empty_history: "No newsletter generated yet.",
    preview: "Preview",
    download: "Download",
    working: "Generating…",
};

fn text(locale: Locale) -> &'static PageText {
    match locale {
        Locale::Fr => &TEXT_FR,
        Locale::En => &TEXT_EN,
    }
}

const STYLE: &str = r#"
body { margin: 0; font-family: Arial, Helvetica, sans-serif; background: #f4f4f7; color: #1f2933; }
main { max-width: 720px; margin: 40px auto; padding: 0 16px; }
section { background: #fff; border: 1px solid #e4e4eb; border-radius: 8px; padding: 24px; margin-bottom: 24px; }
h1 { margin: 0; color: var(--accent); }
label { display: block; font-weight: bold; margin: 16px 0 6px; }
input[type=text] { width: 100%; box-sizing: border-box; padding: 8px; }
small { color: #6b7280; }
button { margin-top: 20px; padding: 10px 20px; border: 0; border-radius: 4px; background: var(--accent); color: #fff; font-weight: bold; cursor: pointer; }
button:disabled { opacity: .6; cursor: wait; }
#result.error { color: #b42318; }
#result.success { color: #067647; }
ul { list-style: none; padding: 0; margin: 0; }
li { padding: 8px 0; border-bottom: 1px solid #e4e4eb; display: flex; justify-content: space-between; gap: 12px; }
li a { margin-left: 12px; color: var(--accent); }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('upload-form');
const result = document.getElementById('result');
const list = document.getElementById('history');
const labels = document.body.dataset;

function entry(file) {
  const li = document.createElement('li');
  const name = document.createElement('span');
  name.textContent = file.filename + ' (' + file.created + ')';
  const links = document.createElement('span');
  for (const [href, text] of [[file.preview_url, labels.preview], [file.download_url, labels.download]]) {
    const a = document.createElement('a');
    a.href = href;
    a.textContent = text;
    if (href === file.preview_url) a.target = '_blank';
    links.appendChild(a);
  }
  li.append(name, links);
  return li;
}

async function refreshHistory() {
  const response = await fetch('/history');
  if (!response.ok) return;
  const data = await response.json();
  list.replaceChildren();
  if (data.files.length === 0) {
    const li = document.createElement('li');
    li.textContent = labels.empty;
    list.appendChild(li);
    return;
  }
  data.files.forEach(file => list.appendChild(entry(file)));
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const button = form.querySelector('button');
  button.disabled = true;
  result.className = '';
  result.textContent = labels.working;
  try {
    const response = await fetch('/upload', { method: 'POST', body: new FormData(form) });
    const data = await response.json();
    if (!response.ok) throw new Error(data.error || response.statusText);
    const s = data.stats;
    result.className = 'success';
    result.replaceChildren(entry({
      filename: data.message + ' ' + data.output_file,
      created: s.total + ' / ' + s.introduction + ' / ' + s.featured + ' / ' + s.resources + ' / ' + s.videos + ' / ' + s.events,
      preview_url: data.preview_url,
      download_url: data.download_url,
    }));
    refreshHistory();
  } catch (err) {
    result.className = 'error';
    result.textContent = err.message;
  } finally {
    button.disabled = false;
  }
});

refreshHistory();
"#;

/// Render the upload page.
pub fn index(config: &AppConfig) -> Markup {
    let locale = config.newsletter.locale;
    let t = text(locale);
    let title = &config.newsletter.title;

    html! {
        (DOCTYPE)
        html lang=(locale.labels().lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (t.subtitle) }
                style { (PreEscaped(STYLE)) }
            }
            body
                style=(format!("--accent: {}", config.colors.accent))
                data-preview=(t.preview)
                data-download=(t.download)
                data-empty=(t.empty_history)
                data-working=(t.working)
            {
                main {
                    section {
                        h1 { (title) }
                        p { (t.subtitle) }
                        form id="upload-form" enctype="multipart/form-data" {
                            label for="excel_file" { (t.file_label) }
                            input type="file" id="excel_file" name="excel_file" accept=".xls,.xlsx" required;
                            small { (t.file_hint) }
                            label for="newsletter_date" { (t.date_label) }
                            input type="text" id="newsletter_date" name="newsletter_date" placeholder=(t.date_placeholder);
                            button type="submit" { (t.submit) }
                        }
                        p id="result" {}
                    }
                    section {
                        h2 { (t.history) }
                        ul id="history" {}
                    }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_posts_the_expected_fields() {
        let html = index(&AppConfig::default()).into_string();
        assert!(html.contains(r#"name="excel_file""#));
        assert!(html.contains(r#"name="newsletter_date""#));
        assert!(html.contains("fetch('/upload'"));
        assert!(html.contains("fetch('/history')"));
    }

    #[test]
    fn page_follows_locale_and_title() {
        let mut config = AppConfig::default();
        config.newsletter.title = "Design <Digest>".to_string();
        let fr = index(&config).into_string();
        assert!(fr.contains("Générer la newsletter"));
        assert!(fr.contains("Design &lt;Digest&gt;"));

        config.newsletter.locale = Locale::En;
        let en = index(&config).into_string();
        assert!(en.contains("Generate newsletter"));
        assert!(en.contains(r#"lang="en""#));
    }
}
