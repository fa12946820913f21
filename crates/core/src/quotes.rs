//! The static quotation collection.
//!
//! Quotes are compiled into the binary and never change at runtime. The
//! collection is small (tens of entries), so id lookup is a linear scan.

use rand::Rng;

/// An immutable quotation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Stable id, used as the foreign key inside a render spec.
    pub id: &'static str,
    /// The quotation body, rendered inside quotation marks.
    pub text: &'static str,
    /// Attribution, rendered as a second line at reduced emphasis.
    pub author: &'static str,
}

/// All quotes known at build time, in a fixed order.
pub const QUOTES: &[Quote] = &[
    Quote {
        id: "q1",
        text: "The best way to predict the future is to invent it.",
        author: "Alan Kay",
    },
    Quote {
        id: "q2",
        text: "Simplicity is the ultimate sophistication.",
        author: "Leonardo da Vinci",
    },
    Quote {
        id: "q3",
        text: "Be the change.",
        author: "Gandhi",
    },
    Quote {
        id: "q4",
        text: "Stay hungry, stay foolish.",
        author: "Stewart Brand",
    },
    Quote {
        id: "q5",
        text: "Whether you think you can or you think you can't, you're right.",
        author: "Henry Ford",
    },
    Quote {
        id: "q6",
        text: "It always seems impossible until it's done.",
        author: "Nelson Mandela",
    },
    Quote {
        id: "q7",
        text: "Not all those who wander are lost.",
        author: "J.R.R. Tolkien",
    },
    Quote {
        id: "q8",
        text: "The journey of a thousand miles begins with a single step.",
        author: "Lao Tzu",
    },
    Quote {
        id: "q9",
        text: "What we think, we become.",
        author: "Buddha",
    },
    Quote {
        id: "q10",
        text: "Do one thing every day that scares you.",
        author: "Eleanor Roosevelt",
    },
    Quote {
        id: "q11",
        text: "Creativity is intelligence having fun.",
        author: "Albert Einstein",
    },
    Quote {
        id: "q12",
        text: "Turn your wounds into wisdom.",
        author: "Oprah Winfrey",
    },
];

/// Looks up a quote by id.
///
/// Total within its domain: every id present in [`QUOTES`] resolves to
/// exactly one quote; any other id yields `None`. Never panics.
pub fn find_quote(id: &str) -> Option<&'static Quote> {
    QUOTES.iter().find(|q| q.id == id)
}

/// Picks one quote uniformly at random from the collection.
pub fn random_quote() -> &'static Quote {
    let index = rand::thread_rng().gen_range(0..QUOTES.len());
    &QUOTES[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_quote_resolves_every_known_id() {
        for quote in QUOTES {
            let found = find_quote(quote.id).expect("known id must resolve");
            assert_eq!(found.id, quote.id);
            assert_eq!(found.text, quote.text);
        }
    }

    #[test]
    fn test_find_quote_unknown_id_is_none() {
        assert!(find_quote("nonexistent").is_none());
        assert!(find_quote("").is_none());
        assert!(find_quote("Q3").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = QUOTES.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), QUOTES.len());
    }

    #[test]
    fn test_random_quote_is_member() {
        for _ in 0..50 {
            let quote = random_quote();
            assert!(find_quote(quote.id).is_some());
        }
    }

    #[test]
    fn test_example_quote_present() {
        let q3 = find_quote("q3").unwrap();
        assert_eq!(q3.text, "Be the change.");
        assert_eq!(q3.author, "Gandhi");
    }
}
