//! Single-skip ELS scan over letter codes.

use els_types::{Direction, ElsError};
use memchr::{memchr_iter, memrchr_iter};
use smallvec::SmallVec;

/// Normalized indices of one accepted sequence, in reading order.
pub type Hit = SmallVec<[usize; 8]>;

/// Finds every start from which reading every `skip`th letter spells the keyword.
///
/// Works purely on normalized letter codes; translating hits back to the
/// original text is the caller's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipSequenceSearcher;

impl SkipSequenceSearcher {
    /// Scans `text` for `keyword` at stride `skip`.
    ///
    /// Forward reads `i, i+skip, i+2·skip, …` with starts taken left to
    /// right. Backward treats the far end as the origin: starts are taken
    /// right to left and read `i, i−skip, i−2·skip, …`.
    ///
    /// # Errors
    ///
    /// `ElsError::InvalidSkip` for `skip == 0`, `ElsError::EmptyKeyword` for
    /// an empty keyword.
    pub fn search(
        &self,
        text: &[u8],
        keyword: &[u8],
        skip: usize,
        direction: Direction,
    ) -> Result<Vec<Hit>, ElsError> {
        let mut hits = Vec::new();
        self.search_into(text, keyword, skip, direction, &mut hits)?;
        Ok(hits)
    }

    /// Like [`search`](Self::search) but appends to `out`.
    ///
    /// Returns the number of hits appended.
    pub fn search_into(
        &self,
        text: &[u8],
        keyword: &[u8],
        skip: usize,
        direction: Direction,
        out: &mut Vec<Hit>,
    ) -> Result<usize, ElsError> {
        if skip == 0 {
            return Err(ElsError::InvalidSkip);
        }
        let Some((&first, rest)) = keyword.split_first() else {
            return Err(ElsError::EmptyKeyword);
        };

        // Distance between the first and last letter read.
        let Some(span) = rest.len().checked_mul(skip) else {
            return Ok(0);
        };
        if span >= text.len() {
            return Ok(0);
        }

        let before = out.len();
        match direction {
            Direction::Forward => {
                for start in memchr_iter(first, text) {
                    if start + span >= text.len() {
                        break;
                    }
                    if rest
                        .iter()
                        .enumerate()
                        .all(|(j, &code)| text[start + (j + 1) * skip] == code)
                    {
                        out.push((0..keyword.len()).map(|j| start + j * skip).collect());
                    }
                }
            }
            Direction::Backward => {
                for start in memrchr_iter(first, text) {
                    if start < span {
                        break;
                    }
                    if rest
                        .iter()
                        .enumerate()
                        .all(|(j, &code)| text[start - (j + 1) * skip] == code)
                    {
                        out.push((0..keyword.len()).map(|j| start - j * skip).collect());
                    }
                }
            }
        }

        Ok(out.len() - before)
    }
}
