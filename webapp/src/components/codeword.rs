use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use tracing::{debug, info};
use web_sys::{Element, HtmlElement, Window};

use site_common::{
    codeword::{CodewordGate, Verdict},
    config::CodewordConfig,
};

use crate::common::dom;

const CONFIRM: &str = "Hinweis:\n\nNur wer ein Codewort bekommen hat, kommt hier weiter.\n\nMit 'OK' geht es zur Eingabe.";
const PROMPT: &str = "Bitte das Codewort eingeben:";
const ACCEPTED: &str = "Das Codewort stimmt.\n\nDer Link erscheint gleich auf der Seite.";

fn retry_prompt(previous: &str, remaining: u32) -> String {
    format!("Leider falsch: \"{previous}\"\n\nNoch {remaining} Versuch(e). Bitte erneut eingeben:")
}

fn rejection(verdict: &Verdict, input: &str) -> Option<String> {
    match verdict {
        Verdict::ContainsDigits => Some(format!(
            "Das Codewort besteht nur aus Buchstaben, ohne Ziffern.\n\nEingegeben wurde: {input}"
        )),
        Verdict::BadLength(len) => Some(format!(
            "Das Codewort ist zwischen 1 und 10 Zeichen lang.\n\nDie Eingabe hatte {len} Zeichen."
        )),
        Verdict::Exhausted => {
            Some(String::from("Keine Versuche mehr übrig. Das Codewort war nicht richtig."))
        }
        _ => None,
    }
}

// codeword prompt
//
// a plain confirm/prompt/alert exchange guarding a members-only link.  a
// cancelled dialog at any point just ends the exchange
pub fn bind(config: &CodewordConfig) -> Result<()> {
    let doc = dom::document()?;

    let Some(trigger) = dom::by_id::<Element>(&doc, &config.trigger_id) else {
        debug!({ id = %config.trigger_id }, "no codeword trigger on page");
        return Ok(());
    };

    let config = config.clone();
    EventListener::new_with_options(
        &trigger,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();

            if let Err(err) = ask(&config) {
                debug!({ error = %err }, "codeword exchange failed");
            }
        },
    )
    .forget();

    info!("codeword prompt bound");
    Ok(())
}

fn ask(config: &CodewordConfig) -> Result<()> {
    let window = dom::window()?;

    if !window.confirm_with_message(CONFIRM).map_err(dom::js_err)? {
        return Ok(());
    }

    let mut gate = CodewordGate::new(config);
    let mut message = String::from(PROMPT);

    loop {
        let Some(input) = window.prompt_with_message(&message).map_err(dom::js_err)? else {
            return Ok(());
        };

        let verdict = gate.submit(&input);
        debug!({ attempts = gate.attempts(), verdict = ?verdict }, "codeword entered");

        match verdict {
            Verdict::Accepted => {
                alert(&window, ACCEPTED);
                return reveal(config);
            }
            Verdict::Wrong { remaining } => message = retry_prompt(&input, remaining),
            other => {
                if let Some(text) = rejection(&other, &input) {
                    alert(&window, &text);
                }
                return Ok(());
            }
        }
    }
}

fn alert(window: &Window, text: &str) {
    if let Err(err) = window.alert_with_message(text) {
        debug!({ error = ?err }, "alert failed");
    }
}

fn reveal(config: &CodewordConfig) -> Result<()> {
    let doc = dom::document()?;

    for el in dom::query_all::<HtmlElement>(&doc, &format!(".{}", config.reveal_class)) {
        dom::set_style(&el, "display", "block");
    }

    for el in dom::query_all::<HtmlElement>(&doc, &format!(".{}", config.hide_class)) {
        dom::set_style(&el, "display", "none");
    }

    let Some(result) = dom::by_id::<Element>(&doc, &config.result_id) else {
        debug!({ id = %config.result_id }, "no result link to reveal");
        return Ok(());
    };

    let href = config
        .reveal_href
        .clone()
        .or_else(|| result.get_attribute("data-href"));

    match href {
        Some(href) => dom::set_attr(&result, "href", href.trim()),
        None => debug!("no reveal href configured"),
    }

    Ok(())
}
