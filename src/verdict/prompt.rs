//! Classification prompt construction
//!
//! Request fields are interpolated verbatim. The model is trusted to treat
//! them as data; no escaping is applied.

use super::ClassificationRequest;

/// Build the supervisor prompt for a request
pub fn build_prompt(request: &ClassificationRequest) -> String {
    let goal = &request.goal;
    let hint = request.context_hint();
    let url = &request.url;

    format!(
        r#"You are a helpful academic supervisor. A student is trying to: "{goal}"
They are currently accessing: {hint}
URL: {url}

Strict Guidelines:
1. ALLOWED: Educational content, documentation, research papers, or search queries directly related to the goal.
2. ALLOWED: YouTube videos if the title/search is specifically about the goal.
3. ALLOWED: Search engines (Google/Bing) if the user is searching for things related to the goal.
4. BLOCKED: Social media, entertainment, unrelated YouTube videos, gaming, or general shopping.
5. BLOCKED: YouTube Home, Shorts, or "Trending" pages.

Decision Rule: If the page helps the student achieve "{goal}", answer ALLOWED. Otherwise, answer BLOCKED.

Response: ONLY "ALLOWED" or "BLOCKED"."#
    )
}
