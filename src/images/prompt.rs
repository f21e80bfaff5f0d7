//! Prompt assembly from product description and style tags

use crate::catalog::TagCatalog;

/// Closing photography directives appended to every prompt
pub const PROMPT_SUFFIX: &str = "The background should be soft-focused. Product photography, shallow depth of field, bokeh background, 8K.";

/// Opening sentence naming the product and pinning its design
pub fn prompt_preamble(product_description: &str) -> String {
    format!(
        "A photorealistic, ultra-detailed, hero shot of {product_description}. CRITICAL: Do not alter, modify, or change the design of the provided PC case in any way. Keep the original product design intact. "
    )
}

/// Build the generation prompt.
///
/// Fragments are appended in request order, duplicates included. Tags the
/// catalog does not know contribute nothing.
pub fn build_prompt<S: AsRef<str>>(
    tags: &TagCatalog,
    requested: &[S],
    product_description: &str,
) -> String {
    let mut prompt = prompt_preamble(product_description);
    for tag in requested {
        if let Some(fragment) = tags.fragment(tag.as_ref()) {
            prompt.push_str(fragment);
        }
    }
    prompt.push_str(PROMPT_SUFFIX);
    prompt
}
