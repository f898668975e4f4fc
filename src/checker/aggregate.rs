// src/checker/aggregate.rs
// =============================================================================
// The one place that decides whether a link is broken.
//
// A link is broken when it is not ignored and either
//   - its status code is >= 400, or
//   - its status code is 0 AND it carries an error message.
//
// Status 0 with no message means "not evaluated" (e.g. external checking
// turned off) and is not broken. The reports and the exit code all go
// through BrokenPolicy::is_broken so they can never disagree.
// =============================================================================

use crate::scanner::{Link, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenPolicy {
    /// Whether failed mailto: domain checks count as broken
    pub count_mail_failures: bool,
}

impl Default for BrokenPolicy {
    fn default() -> Self {
        BrokenPolicy {
            count_mail_failures: true,
        }
    }
}

impl BrokenPolicy {
    pub fn is_broken(&self, link: &Link) -> bool {
        if link.ignored {
            return false;
        }

        let failed = link.status_code >= 400
            || (link.status_code == 0 && !link.error_message.is_empty());

        failed && (self.count_mail_failures || !link.is_mailto())
    }
}

pub fn count_broken(pages: &[Page], policy: &BrokenPolicy) -> usize {
    pages
        .iter()
        .flat_map(|page| page.links.iter())
        .filter(|link| policy.is_broken(link))
        .count()
}
