use std::collections::HashMap;

use crate::text::tokenize;

const K1: f32 = 1.2;
const B: f32 = 0.75;

/// BM25 inverted index over the catalog document texts. Built once from the
/// startup snapshot and read-only afterwards; documents are addressed by
/// their position in the snapshot.
#[derive(Debug, Default)]
pub struct Bm25Index {
	/// term -> (doc index -> term frequency)
	postings: HashMap<String, HashMap<usize, f32>>,
	doc_lengths: Vec<f32>,
	avg_doc_length: f32,
}

impl Bm25Index {
	pub fn build<S: AsRef<str>>(documents: &[S]) -> Self {
		let mut postings: HashMap<String, HashMap<usize, f32>> = HashMap::new();
		let mut doc_lengths = Vec::with_capacity(documents.len());

		for (index, document) in documents.iter().enumerate() {
			let tokens = tokenize(document.as_ref());

			doc_lengths.push(tokens.len() as f32);

			let mut term_freq: HashMap<String, f32> = HashMap::new();

			for token in tokens {
				*term_freq.entry(token).or_insert(0.0) += 1.0;
			}
			for (term, freq) in term_freq {
				postings.entry(term).or_default().insert(index, freq);
			}
		}

		let avg_doc_length = if doc_lengths.is_empty() {
			0.0
		} else {
			doc_lengths.iter().sum::<f32>() / doc_lengths.len() as f32
		};

		Self { postings, doc_lengths, avg_doc_length }
	}

	pub fn len(&self) -> usize {
		self.doc_lengths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.doc_lengths.is_empty()
	}

	/// Scores every indexed document against the query and returns up to
	/// `top_k` `(doc index, score)` pairs sorted descending. Uses Robertson's
	/// non-negative IDF: `ln((N - df + 0.5) / (df + 0.5) + 1)`.
	pub fn search(&self, query: &str, top_k: usize) -> Vec<(usize, f32)> {
		if self.doc_lengths.is_empty() || top_k == 0 {
			return Vec::new();
		}

		let query_tokens = tokenize(query);

		if query_tokens.is_empty() {
			return Vec::new();
		}

		let n = self.doc_lengths.len() as f32;
		let avgdl = if self.avg_doc_length > 0.0 { self.avg_doc_length } else { 1.0 };
		let mut scores: HashMap<usize, f32> = HashMap::new();

		for token in &query_tokens {
			let Some(postings) = self.postings.get(token) else {
				continue;
			};
			let df = postings.len() as f32;
			let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

			for (&index, &tf) in postings {
				let dl = self.doc_lengths[index];
				let term_score = idf * (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * dl / avgdl));

				*scores.entry(index).or_insert(0.0) += term_score;
			}
		}

		let mut results: Vec<(usize, f32)> = scores.into_iter().collect();

		// Index as the secondary key keeps equal-score ordering reproducible.
		results.sort_by(|a, b| {
			b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0))
		});
		results.truncate(top_k);

		results
	}
}
