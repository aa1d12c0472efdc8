//! Prompt templates and rendering

use claimscan_domain::{ViolationCategory, YES_DELIMITER};

/// Placeholder replaced by the bullet list of category descriptions
pub const DESCRIPTIONS_PLACEHOLDER: &str = "{violation_descriptions}";

/// Placeholder replaced by the violation reply delimiter
pub const DELIMITER_PLACEHOLDER: &str = "{yes_delimiter}";

/// Excluded items being claimed (pools, patios, ...)
pub const EXCLUDED_ITEMS_TEMPLATE: &str = "\
You are an expert flood insurance adjuster and can accurately detect if a page tries to \
claim items that are not covered. Your job is to look for the following excluded items:
{violation_descriptions}
Remember your job is to detect ONLY these specific items and ignore all other possible \
violations. Pages will be fed to you one at a time and you will try to determine if there \
are item(s) from the above list being claimed. This means:
    - There's usually monetary value like RCV, ACV, damages, or price associated with the item
    - Just mentioning the item isn't enough, for example statements like \"the policyholder \
did not purchase coverage for pools\" or \"pool and patio damages are not covered\" are not \
violations and should not be flagged because no items are incorrectly being claimed

After each page of the claim is fed to you, think about if there's a possible violation or if the items are \
being mentioned but not claimed (e.g. stated as not being covered). Finally, respond with either:
    - 'NONE', if no out-of-policy item violation is detected, which is common
    - '{yes_delimiter}', followed by a short summary (1-3 sentences) of the page and which \
of the items above are being claimed. Omit any monetary values.
";

/// Replacement cost value used on ineligible property types
pub const RCV_PROPERTY_TEMPLATE: &str = "\
You are an expert flood insurance adjuster. Your role is to identify a specific type of violation, which is when RCV is \
used to claim ineligible property types. Look for only the following ineligible property types:
{violation_descriptions}
Only flag these violations and nothing else. After each page of the claim is fed to you, you will respond with either:
    - 'NONE', if none of the above violations are detected, which is common
    - '{yes_delimiter}', followed by a short summary (1-3 sentences) of the page and how it mentions a \
violation from the above list. Omit any monetary values.
Remember your job is to detect ONLY those specific violations and nothing else.
";

/// Unaffected items of a matching pair or set being claimed
pub const PAIR_CLAUSE_TEMPLATE: &str = "\
You are an expert flood insurance adjuster. \
One common problem is when upper cabinets are claimed, as this may be a violation of the pair and set clause. \
Ignore mentions of lower cabinets and lower cabinetry from your analysis as this by itself is not a policy violation. \
Look for the following:
{violation_descriptions}
After each page of the claim is fed to you, you will respond with either:
    - 'NONE', if upper cabinets are not being claimed, which is common
    - '{yes_delimiter}', followed by a short summary (1-3 sentences) of the page and how it claims \
upper cabinets. Omit any monetary values.
Remember your job is to detect ONLY those specific violations and nothing else.
";

/// System prompt of the claim-level summarizer
pub const SUMMARIZATION_PROMPT: &str = "\
You are an expert flood insurance adjuster responsible for summarizing some of the possible reasons for why a claim may be \
in violation of the policy. You are given possible violations, and the associated page numbers of the violations. \
However, you are aware that sometimes the reasons are false positives. For example, an item may be mentioned in \
the policy but is not being explicitly claimed. Start your response with the sentence 'Possible violations flagged in the claim are:' \
followed by a concise summary of the key violations and their associated page numbers in bullet form. \
Base your answer only on the information that is provided and omit any dollar amounts in the summary.
";

/// Render a classifier system prompt.
///
/// Pure function: the same template and categories always give the same
/// prompt. Each category contributes one `- <description>` line.
///
/// # Examples
///
/// ```
/// use claimscan_domain::ViolationCategory;
/// use claimscan_scanner::render_prompt;
///
/// let categories = vec![ViolationCategory::new("patios", "patios", ["patio"])];
/// let prompt = render_prompt("Look for:\n{violation_descriptions}Answer {yes_delimiter}", &categories);
/// assert_eq!(prompt, "Look for:\n- patios\nAnswer YES:");
/// ```
pub fn render_prompt(template: &str, categories: &[ViolationCategory]) -> String {
    let descriptions: String = categories
        .iter()
        .map(|category| format!("- {}\n", category.description))
        .collect();

    template
        .replace(DESCRIPTIONS_PLACEHOLDER, &descriptions)
        .replace(DELIMITER_PLACEHOLDER, YES_DELIMITER)
}

/// Render the findings of a claim as the summarizer's user message
pub fn render_findings(findings: &[(usize, String)]) -> String {
    let entries: Vec<String> = findings
        .iter()
        .map(|(page, reason)| format!("(page_no={}, issue_desc='{}')", page, reason))
        .collect();
    format!("Potential violations: [{}]", entries.join(", "))
}
