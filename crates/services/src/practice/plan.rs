use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use portal_core::model::{
    CatalogEntry, ChapterId, ChapterSelection, PracticeSessionConfig, QuestionId, QuestionOrder,
    QuestionSelection,
};

/// Questions available per chapter, each list in book order.
pub type ChapterCatalog = BTreeMap<ChapterId, Vec<CatalogEntry>>;

/// Turns a validated config plus the book's catalog into an ordered selection.
pub struct SelectionPlanner<'a> {
    config: &'a PracticeSessionConfig,
}

impl<'a> SelectionPlanner<'a> {
    #[must_use]
    pub fn new(config: &'a PracticeSessionConfig) -> Self {
        Self { config }
    }

    /// Build the selection.
    ///
    /// - `range` picks 1-based positions inside the chapter, clamped to what exists.
    /// - `quantity` samples up to `count` questions, kept in book order.
    /// - Chapters missing from `catalog` contribute nothing.
    pub fn plan<R: Rng + ?Sized>(self, catalog: &ChapterCatalog, rng: &mut R) -> QuestionSelection {
        let mut per_chapter: Vec<Vec<QuestionId>> = Vec::with_capacity(self.config.chapters().len());

        for (chapter, selection) in self.config.chapters() {
            let mut entries: Vec<&CatalogEntry> = catalog
                .get(chapter)
                .map(|list| list.iter().collect())
                .unwrap_or_default();
            entries.sort_by(|a, b| {
                a.question_number_in_book
                    .cmp(&b.question_number_in_book)
                    .then_with(|| a.id.cmp(&b.id))
            });

            let picked = pick(&entries, *selection, rng);
            if !picked.is_empty() {
                per_chapter.push(picked);
            }
        }

        let ordered = match self.config.question_order() {
            QuestionOrder::Sequential => per_chapter.into_iter().flatten().collect(),
            QuestionOrder::Interleaved => interleave(per_chapter),
            QuestionOrder::Shuffle => {
                let mut all: Vec<QuestionId> = per_chapter.into_iter().flatten().collect();
                all.as_mut_slice().shuffle(rng);
                all
            }
        };

        QuestionSelection::new(ordered)
    }
}

fn pick<R: Rng + ?Sized>(
    entries: &[&CatalogEntry],
    selection: ChapterSelection,
    rng: &mut R,
) -> Vec<QuestionId> {
    match selection {
        ChapterSelection::Range { start, end } => {
            let skip = usize::try_from(start.saturating_sub(1)).unwrap_or(usize::MAX);
            let take = usize::try_from(end - start + 1).unwrap_or(usize::MAX);
            entries
                .iter()
                .skip(skip)
                .take(take)
                .map(|e| e.id.clone())
                .collect()
        }
        ChapterSelection::Quantity { count } => {
            let amount = usize::try_from(count).unwrap_or(usize::MAX).min(entries.len());
            let mut sampled: Vec<&CatalogEntry> =
                entries.choose_multiple(rng, amount).copied().collect();
            sampled.sort_by(|a, b| {
                a.question_number_in_book
                    .cmp(&b.question_number_in_book)
                    .then_with(|| a.id.cmp(&b.id))
            });
            sampled.into_iter().map(|e| e.id.clone()).collect()
        }
    }
}

/// Round-robin across chapters until every list is exhausted.
fn interleave(chapters: Vec<Vec<QuestionId>>) -> Vec<QuestionId> {
    let total = chapters.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = chapters.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for it in &mut iters {
            if let Some(id) = it.next() {
                out.push(id);
            }
        }
    }
    out
}
