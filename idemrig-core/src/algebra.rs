//! The formal universe: coefficient saturation, the tuple codec and the two
//! operations, either evaluated on demand or materialized as dense tables.

use crate::ids::Element;
use tracing::{debug, info};

/// Coefficient of a single monomial, always in `0..4`.
pub type Coefficient = u8;

/// Formal sum `sum(t[k] * monomial[k])`.
pub type Tuple<const N: usize> = [Coefficient; N];

/// Collapse an integer coefficient using `(1+1)^2 = 1+1`, so `4 = 2`, `5 = 3`, ...
#[must_use]
pub fn saturate(c: u32) -> Coefficient {
    if c < 4 { c as Coefficient } else { 2 + (c % 2) as Coefficient }
}

/// A fixed monomial basis together with its multiplication rule.
///
/// `table[i][j]` is the tag of the monomial `names[i] * names[j]`. Tag 0 must be
/// the multiplicative identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation<const N: usize> {
    pub names: [&'static str; N],
    pub table: [[usize; N]; N],
}

/// `{1, a, b, ab, ba, aba, bab}`: the monoid generated by two idempotent letters.
pub const TWO_GENERATORS: Presentation<7> = Presentation {
    names: ["1", "a", "b", "ab", "ba", "aba", "bab"],
    table: [
        [0, 1, 2, 3, 4, 5, 6],
        [1, 1, 3, 3, 5, 5, 3],
        [2, 4, 2, 6, 4, 4, 6],
        [3, 5, 3, 3, 5, 5, 3],
        [4, 4, 6, 6, 4, 4, 6],
        [5, 5, 3, 3, 5, 5, 3],
        [6, 4, 6, 6, 4, 4, 6],
    ],
};

/// `{1, a}` with `aa = a`. Small enough for exhaustive checks.
pub const ONE_GENERATOR: Presentation<2> = Presentation {
    names: ["1", "a"],
    table: [[0, 1], [1, 1]],
};

impl<const N: usize> Presentation<N> {
    /// Number of formal tuples, `4^N`.
    pub const UNIVERSE: usize = 1 << (2 * N);

    /// Pack two bits per coefficient, monomial 0 in the lowest bits.
    pub fn encode(&self, tuple: &Tuple<N>) -> Element {
        Element(
            tuple
                .iter()
                .enumerate()
                .fold(0, |acc, (k, &c)| acc | (usize::from(c & 0b11) << (2 * k))),
        )
    }

    #[must_use]
    pub fn decode(&self, e: Element) -> Tuple<N> {
        debug_assert!(e.0 < Self::UNIVERSE, "{e} outside of the universe");
        std::array::from_fn(|k| ((e.0 >> (2 * k)) & 0b11) as Coefficient)
    }

    /// The element `1 * names[k]`.
    pub fn monomial(&self, k: usize) -> Element {
        Element(1 << (2 * k))
    }

    /// Distribute, accumulate into the product monomial's slot, saturate at the end.
    #[must_use]
    pub fn mul_tuples(&self, t1: &Tuple<N>, t2: &Tuple<N>) -> Tuple<N> {
        let mut raw = [0u32; N];
        for (i, &c1) in t1.iter().enumerate() {
            if c1 == 0 {
                continue;
            }
            for (j, &c2) in t2.iter().enumerate() {
                raw[self.table[i][j]] += u32::from(c1) * u32::from(c2);
            }
        }
        raw.map(saturate)
    }

    #[must_use]
    pub fn add_tuples(&self, t1: &Tuple<N>, t2: &Tuple<N>) -> Tuple<N> {
        std::array::from_fn(|k| saturate(u32::from(t1[k]) + u32::from(t2[k])))
    }

    /// Whether the monomial rule is associative with tag 0 as identity.
    #[must_use]
    pub fn is_monoid(&self) -> bool {
        let identity = (0..N).all(|k| self.table[0][k] == k && self.table[k][0] == k);
        let associative = (0..N).all(|i| {
            (0..N).all(|j| {
                (0..N).all(|k| self.table[self.table[i][j]][k] == self.table[i][self.table[j][k]])
            })
        });
        identity && associative
    }
}

/// The two operations on a finite universe of elements `0..universe()`.
///
/// The universe must be spanned additively by `monomials()` and the operations
/// must form a rig, which is what lets refinement only look at translations by
/// monomials.
pub trait Algebra {
    fn universe(&self) -> usize;
    fn mul(&self, x: Element, y: Element) -> Element;
    fn add(&self, x: Element, y: Element) -> Element;
    fn monomials(&self) -> &[Element];
}

/// Evaluates the operations from the presentation on every call.
#[derive(Clone, Debug)]
pub struct FormalRig<const N: usize> {
    presentation: Presentation<N>,
    monomials: Vec<Element>,
}

impl<const N: usize> FormalRig<N> {
    #[must_use]
    pub fn new(presentation: Presentation<N>) -> Self {
        debug_assert!(presentation.is_monoid());
        let monomials = (0..N).map(|k| presentation.monomial(k)).collect();
        Self {
            presentation,
            monomials,
        }
    }
    #[must_use]
    pub fn presentation(&self) -> &Presentation<N> {
        &self.presentation
    }
}

impl<const N: usize> Algebra for FormalRig<N> {
    fn universe(&self) -> usize {
        Presentation::<N>::UNIVERSE
    }
    fn mul(&self, x: Element, y: Element) -> Element {
        let p = &self.presentation;
        p.encode(&p.mul_tuples(&p.decode(x), &p.decode(y)))
    }
    fn add(&self, x: Element, y: Element) -> Element {
        let p = &self.presentation;
        p.encode(&p.add_tuples(&p.decode(x), &p.decode(y)))
    }
    fn monomials(&self) -> &[Element] {
        &self.monomials
    }
}

/// Dense multiplication and addition tables (MTAB and ATAB), row-major.
///
/// Two bytes per entry, so the two-generator universe takes `2 * 2 * 4^14` bytes.
#[derive(Clone, Debug)]
pub struct AlgebraTables {
    universe: usize,
    mtab: Vec<u16>,
    atab: Vec<u16>,
    monomials: Vec<Element>,
}

impl AlgebraTables {
    #[must_use]
    pub fn build<const N: usize>(presentation: &Presentation<N>) -> Self {
        let universe = Presentation::<N>::UNIVERSE;
        assert!(
            universe <= usize::from(u16::MAX) + 1,
            "{N} monomials do not fit in u16 table entries"
        );
        info!(universe, "building multiplication and addition tables");

        let tuples: Vec<Tuple<N>> = (0..universe)
            .map(|i| presentation.decode(Element(i)))
            .collect();
        let mut mtab = Vec::with_capacity(universe * universe);
        let mut atab = Vec::with_capacity(universe * universe);
        for (x1, t1) in tuples.iter().enumerate() {
            if x1 % 1024 == 0 {
                debug!("table row {x1} / {universe}");
            }
            for t2 in &tuples {
                mtab.push(presentation.encode(&presentation.mul_tuples(t1, t2)).0 as u16);
                atab.push(presentation.encode(&presentation.add_tuples(t1, t2)).0 as u16);
            }
        }
        Self {
            universe,
            mtab,
            atab,
            monomials: (0..N).map(|k| presentation.monomial(k)).collect(),
        }
    }
    fn at(&self, x: Element, y: Element) -> usize {
        x.0 * self.universe + y.0
    }
}

impl Algebra for AlgebraTables {
    fn universe(&self) -> usize {
        self.universe
    }
    fn mul(&self, x: Element, y: Element) -> Element {
        Element(usize::from(self.mtab[self.at(x, y)]))
    }
    fn add(&self, x: Element, y: Element) -> Element {
        Element(usize::from(self.atab[self.at(x, y)]))
    }
    fn monomials(&self) -> &[Element] {
        &self.monomials
    }
}
