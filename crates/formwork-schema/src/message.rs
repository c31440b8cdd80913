//! Default messages
//!
//! Messages are looked up by key through [`Environment::translate`]
//! (`validation.<code>`, `validation.pattern.<category>`). The built-in
//! translator returns the English templates below; `{name}` placeholders are
//! filled afterwards by [`render`].
//!
//! [`Environment::translate`]: crate::env::Environment::translate

use crate::context::ValidationContext;

/// English template for `key`, or the key itself when unknown.
pub fn english(key: &str) -> String {
    let template = match key {
        "validation.required" => "{label} is required.",
        "validation.length" => "{label} must be exactly {length} characters.",
        "validation.minLength" => "{label} must be at least {min} characters.",
        "validation.maxLength" => "{label} must be at most {max} characters.",
        "validation.items" => "{label} must have exactly {length} items.",
        "validation.minItems" => "{label} must have at least {min} items.",
        "validation.maxItems" => "{label} must have at most {max} items.",
        "validation.min" => "{label} must be {min} or more.",
        "validation.max" => "{label} must be {max} or less.",
        "validation.precision" => "{label} must have at most {precision} decimal places.",
        "validation.pattern" => "{label} is not in the expected format.",
        "validation.pattern.integer" => "{label} must be an integer.",
        "validation.pattern.numeric" => "{label} must contain only digits.",
        "validation.pattern.fullWidthNumeric" => "{label} must contain only full-width digits.",
        "validation.pattern.alphabet" => "{label} must contain only letters.",
        "validation.pattern.alphaNumeric" => "{label} must contain only letters and digits.",
        "validation.pattern.katakana" => "{label} must be written in katakana.",
        "validation.pattern.halfWidthKatakana" => "{label} must be written in half-width katakana.",
        "validation.pattern.hiragana" => "{label} must be written in hiragana.",
        "validation.pattern.email" => "{label} must be a valid email address.",
        "validation.pattern.tel" => "{label} must be a valid telephone number.",
        "validation.pattern.url" => "{label} must be a valid URL.",
        "validation.pattern.postalCode" => "{label} must be a valid postal code.",
        "validation.source" => "{label} has an invalid selection.",
        "validation.accept" => "{label} has an unsupported file type.",
        "validation.maxSize" => "{label} must be {max} bytes or smaller.",
        "validation.pair.before" => "{label} must be before {target}.",
        "validation.pair.after" => "{label} must be after {target}.",
        "validation.invalidText" => "{label} must be text.",
        "validation.invalidNumber" => "{label} must be a number.",
        "validation.invalidBoolean" => "{label} must be true or false.",
        "validation.invalidDate" => "{label} must be a valid date.",
        "validation.invalidMonth" => "{label} must be a valid month.",
        "validation.invalidDateTime" => "{label} must be a valid date and time.",
        "validation.invalidFile" => "{label} must be a file.",
        _ => key,
    };
    template.to_string()
}

/// Replace `{name}` placeholders in `template`.
pub fn format(template: &str, params: &[(&str, String)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}

/// Translate `key` in the context's environment and fill in `{label}` plus
/// `params`.
pub fn render(ctx: &ValidationContext<'_>, key: &str, params: &[(&str, String)]) -> String {
    let template = ctx.translate(key);
    let text = format(&template, params);
    format(&text, &[("label", ctx.label.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_replaces_all_occurrences() {
        let text = format("{a}-{b}-{a}", &[("a", "1".into()), ("b", "2".into())]);
        assert_eq!(text, "1-2-1");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(english("validation.nope"), "validation.nope");
    }
}
