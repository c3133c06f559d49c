use leptos::prelude::*;

/// Renders GFM. Raw HTML in the source is escaped, answers come from a remote server.
/// Math syntax stays off: answers quote prices, and `$` pairs must stay literal.
pub fn to_html(markdown_text: &str) -> String {
    let options = markdown::Options {
        parse: markdown::ParseOptions::gfm(),
        compile: markdown::CompileOptions::gfm(),
    };
    markdown::to_html_with_options(markdown_text, &options)
        .unwrap_or_else(|_| markdown::to_html(markdown_text))
}

#[component]
pub fn Markdown(#[prop(into)] markdown_text: String) -> impl IntoView {
    let html_output = to_html(&markdown_text);
    view! { <div class="markdown" inner_html=html_output></div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tables_and_escapes_html() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n<script>x</script>");
        assert!(html.contains("<table>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn dollar_amounts_stay_literal() {
        let html = to_html("Product A costs $10.99 and Product B costs $24.99.");
        assert!(html.contains("<p>Product A costs $10.99 and Product B costs $24.99.</p>"));
        assert!(!html.contains("math"));
    }
}
