/// Clean generated text before it is handed to a client using the ammonia library.
///
/// Quiz text comes from a language model and clients render it as HTML, so
/// safe formatting tags (like <b>, <code>) are kept while scripts, iframes and
/// event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
