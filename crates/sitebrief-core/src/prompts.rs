//! System instructions and user-prompt templates.

use crate::models::{LinkSelection, Page};

/// Upper bound on the brochure user prompt, in characters.
pub const MAX_BROCHURE_PROMPT_CHARS: usize = 5_000;

/// Instruction for plain page summaries.
pub const CONTENT_ANALYST: &str = "\
ROLE: Professional Content Analyst

TASK:
- Analyze and summarize web content
- Focus on main content, ignore navigation elements
- Be objective, factual and professional

FORMAT:
- Use markdown formatting
- Structure with clear headings
- Use bullet points for lists
- Bold important terms";

/// Instruction for picking brochure-relevant links. Pinned to the
/// `{"links": [{"type", "url"}]}` shape parsed by the link classifier.
pub const BROCHURE_LINKS_ANALYST: &str = r#"ROLE: Professional Content Analyst

TASK:
- Analyze the provided list of links from a company website
- Identify which links are most relevant for a company brochure
- Focus on pages like About, Company, Team, Careers, Services, Products, Contact
- Ignore login, privacy policy, terms of service, social media and other non-essential pages

RESPONSE FORMAT:
- Respond with a JSON object containing an array of relevant links
- Each link should have a 'type' (e.g., 'about page', 'careers page')
- Include the full URL in the 'url' field
- Only include genuinely relevant links (0-5 links is typical)

EXAMPLE RESPONSE:
{
    "links": [
        {"type": "about page", "url": "https://example.com/about"},
        {"type": "careers page", "url": "https://example.com/careers"}
    ]
}"#;

/// Instruction for writing the brochure itself.
pub const BROCHURE_WRITER: &str = "\
ROLE: Professional Content Analyst

TASK:
- Analyze the contents of several relevant pages from a company website
- Create a short brochure about the company for prospective customers, investors and recruits
- Respond in markdown
- Include details of company culture, customers and careers/jobs if you have the information
- The brochure must be written in the language of the website";

/// User prompt for a summary of `page`, followed by any extra pages.
pub fn summary_prompt(page: &Page, extra_pages: &[Page]) -> String {
    let mut prompt = format!(
        "# Website Summary Request\n## Website Title: {}\n\n## Content to Summarize:\n{}",
        page.title, page.text
    );

    for extra in extra_pages {
        prompt.push_str(&format!(
            "\n\n## Related Page: {} ({})\n{}",
            extra.title, extra.url, extra.text
        ));
    }

    prompt
}

/// User prompt listing every link found on `page`.
pub fn links_prompt(page: &Page) -> String {
    format!(
        "Here is the list of links on the website of {}.\n\
         Please decide which of these are relevant web links for a brochure about the company.\n\
         Respond with the full https URL in JSON format.\n\
         Do not include Terms of Service, Privacy, or email links.\n\n\
         Links (some might be relative links):\n{}",
        page.url,
        page.links.join("\n")
    )
}

/// Landing page content followed by each selected page under its category.
pub fn brochure_details(landing: &Page, related: &[(LinkSelection, Page)]) -> String {
    let mut details = String::from("Landing page:\n");
    details.push_str(&landing.content());

    for (selection, page) in related {
        details.push_str(&format!("\n\n{}\n", selection.kind));
        details.push_str(&page.content());
    }

    details
}

/// User prompt for the brochure, capped at [`MAX_BROCHURE_PROMPT_CHARS`].
///
/// Only the details block is shortened, so the framing instructions survive.
pub fn brochure_prompt(url: &str, details: &str) -> String {
    let head = format!(
        "You are looking at the website {url} of a company.\n\
         Here are the contents of its landing page and other relevant pages; \
         use this information to build a short brochure of the company in markdown.\n"
    );
    let tail = "\nRespond in markdown.";

    let budget = MAX_BROCHURE_PROMPT_CHARS
        .saturating_sub(head.chars().count() + tail.chars().count());
    let details = truncate_chars(details, budget);

    format!("{head}{details}{tail}")
}

/// Longest prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
