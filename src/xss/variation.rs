// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Candidate URL generation

use std::collections::HashSet;

use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use super::{Candidate, InjectionPoint};
use crate::payload::encode;

/// Expands a target URL into test candidates, one per injection point and payload
#[derive(Debug, Clone, Default)]
pub struct VariationGenerator {
    encoding_rounds: u32,
}

impl VariationGenerator {
    /// Create a generator applying `encoding_rounds` percent-encodings to payloads
    pub fn new(encoding_rounds: u32) -> Self {
        Self { encoding_rounds }
    }

    /// Encoding rounds applied to every payload
    pub fn encoding_rounds(&self) -> u32 {
        self.encoding_rounds
    }

    /// All candidates for one target, before deduplication.
    ///
    /// Yields `|payloads| * (k + 1)` candidates for a target with `k` query
    /// parameters. A target that does not parse yields a single unmodified
    /// candidate.
    pub fn expand(&self, target: &str, payloads: &[String]) -> Vec<Candidate> {
        let parsed = match Url::parse(target) {
            Ok(url) => url,
            Err(e) => {
                warn!("Malformed target {}: {}, testing it unmodified", target, e);
                return payloads
                    .first()
                    .map(|payload| Candidate {
                        target: target.to_string(),
                        injection: InjectionPoint::Unmodified,
                        payload: payload.clone(),
                        encoding_rounds: self.encoding_rounds,
                        url: target.to_string(),
                    })
                    .into_iter()
                    .collect();
            }
        };

        let query = parsed.query().unwrap_or("").to_string();
        let params = query_params(&query);

        let mut candidates = Vec::with_capacity(payloads.len() * (params.len() + 1));

        for payload in payloads {
            let encoded = encode(payload, self.encoding_rounds);

            candidates.push(Candidate {
                target: target.to_string(),
                injection: InjectionPoint::Appended,
                payload: payload.clone(),
                encoding_rounds: self.encoding_rounds,
                url: format!("{}{}", target, encoded),
            });

            for (segment, name) in &params {
                let mut url = parsed.clone();
                url.set_query(Some(&splice_query(&query, *segment, &encoded)));

                candidates.push(Candidate {
                    target: target.to_string(),
                    injection: InjectionPoint::Parameter(name.clone()),
                    payload: payload.clone(),
                    encoding_rounds: self.encoding_rounds,
                    url: url.to_string(),
                });
            }
        }

        candidates
    }

    /// Deduplicated candidates for one target
    pub fn generate(&self, target: &str, payloads: &[String]) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        self.expand(target, payloads)
            .into_iter()
            .filter(|c| seen.insert(c.url.clone()))
            .collect()
    }

    /// Deduplicated candidates for every target, in target order
    pub fn generate_all(&self, targets: &[String], payloads: &[String]) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let candidates: Vec<Candidate> = targets
            .iter()
            .flat_map(|target| self.expand(target, payloads))
            .filter(|c| seen.insert(c.url.clone()))
            .collect();

        debug!(
            "Generated {} candidates from {} targets x {} payloads",
            candidates.len(),
            targets.len(),
            payloads.len()
        );
        candidates
    }
}

/// Non-empty `&`-separated segments of a raw query, as (segment index, decoded name)
fn query_params(query: &str) -> Vec<(usize, String)> {
    query
        .split('&')
        .enumerate()
        .filter(|(_, segment)| !segment.is_empty())
        .filter_map(|(index, segment)| {
            form_urlencoded::parse(segment.as_bytes())
                .next()
                .map(|(name, _)| (index, name.into_owned()))
        })
        .collect()
}

/// Raw query with the value of segment `index` replaced by `value`.
///
/// `value` is inserted as-is; every other segment is kept byte for byte.
fn splice_query(query: &str, index: usize, value: &str) -> String {
    query
        .split('&')
        .enumerate()
        .map(|(i, segment)| {
            if i == index {
                let name = segment.split_once('=').map_or(segment, |(name, _)| name);
                format!("{}={}", name, value)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::decode;

    fn payloads(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_query_yields_one_per_payload() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["<b>", "<i>", "<script>alert(1)</script>"]);

        let candidates = generator.generate("http://test.local/page", &corpus);

        assert_eq!(candidates.len(), corpus.len());
        assert!(candidates
            .iter()
            .all(|c| c.injection == InjectionPoint::Appended));
        assert_eq!(candidates[0].url, "http://test.local/page<b>");
    }

    #[test]
    fn test_k_params_yield_payloads_times_k_plus_one() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["<b>", "<i>"]);

        let candidates = generator.expand("http://test.local/s?q=1&lang=&page=3", &corpus);

        assert_eq!(candidates.len(), corpus.len() * 4);
    }

    #[test]
    fn test_replacement_keeps_other_params() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["x<y"]);

        let candidates = generator.generate("http://test.local/s?q=1&lang=", &corpus);
        let replaced: Vec<_> = candidates
            .iter()
            .filter(|c| matches!(c.injection, InjectionPoint::Parameter(_)))
            .collect();

        assert_eq!(replaced.len(), 2);
        let q = Url::parse(&replaced[0].url).unwrap();
        let pairs: Vec<(String, String)> = q
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "x<y".to_string()),
                ("lang".to_string(), String::new())
            ]
        );
        assert_eq!(replaced[1].parameter().as_deref(), Some("lang"));
    }

    #[test]
    fn test_encoding_rounds_applied() {
        let generator = VariationGenerator::new(1);
        let corpus = payloads(&["<b>"]);

        // Appended and replaced collapse to the same URL.
        let candidates = generator.generate("http://test.local/?q=", &corpus);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "http://test.local/?q=%3Cb%3E");
        assert_eq!(candidates[0].payload, "<b>");
        assert_eq!(candidates[0].encoding_rounds, 1);
    }

    #[test]
    fn test_replaced_value_encoded_exactly_n_rounds() {
        let corpus = payloads(&["<b>"]);

        for (rounds, expected) in [
            (1, "http://test.local/?q=%3Cb%3E"),
            (2, "http://test.local/?q=%253Cb%253E"),
        ] {
            let candidates =
                VariationGenerator::new(rounds).generate("http://test.local/?q=1", &corpus);
            let replaced = candidates
                .iter()
                .find(|c| c.injection == InjectionPoint::Parameter("q".into()))
                .unwrap();
            assert_eq!(replaced.url, expected);
            assert_eq!(decode(&replaced.url, rounds), "http://test.local/?q=<b>");
        }
    }

    #[test]
    fn test_other_params_kept_byte_for_byte() {
        let generator = VariationGenerator::new(1);
        let corpus = payloads(&["<b>"]);

        let candidates = generator.generate("http://test.local/s?q=1&a=%20&flag", &corpus);
        let urls: Vec<(&InjectionPoint, &str)> = candidates
            .iter()
            .map(|c| (&c.injection, c.url.as_str()))
            .collect();

        assert_eq!(
            urls,
            vec![
                (&InjectionPoint::Appended, "http://test.local/s?q=1&a=%20&flag%3Cb%3E"),
                (
                    &InjectionPoint::Parameter("q".into()),
                    "http://test.local/s?q=%3Cb%3E&a=%20&flag"
                ),
                (
                    &InjectionPoint::Parameter("a".into()),
                    "http://test.local/s?q=1&a=%3Cb%3E&flag"
                ),
                (
                    &InjectionPoint::Parameter("flag".into()),
                    "http://test.local/s?q=1&a=%20&flag=%3Cb%3E"
                ),
            ]
        );
    }

    #[test]
    fn test_query_splicing_skips_empty_segments() {
        assert_eq!(
            query_params("a=1&&b"),
            vec![(0, "a".to_string()), (2, "b".to_string())]
        );
        assert_eq!(splice_query("a=1&&b", 2, "x"), "a=1&&b=x");
        assert_eq!(splice_query("a=1&&b", 0, "%3C"), "a=%3C&&b");
    }

    #[test]
    fn test_duplicate_urls_removed() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["<b>", "<b>"]);

        assert_eq!(generator.expand("http://test.local/", &corpus).len(), 2);
        assert_eq!(generator.generate("http://test.local/", &corpus).len(), 1);
    }

    #[test]
    fn test_malformed_target_degrades() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["<b>", "<i>"]);

        let candidates = generator.generate("not a url at all", &corpus);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "not a url at all");
        assert_eq!(candidates[0].injection, InjectionPoint::Unmodified);
    }

    #[test]
    fn test_generate_all_spans_targets() {
        let generator = VariationGenerator::new(0);
        let corpus = payloads(&["<b>"]);
        let targets = payloads(&["http://a.test/?q=1", "http://b.test/"]);

        let candidates = generator.generate_all(&targets, &corpus);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].target, "http://b.test/");
    }
}
