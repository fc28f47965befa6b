//! Textual output: expressions, the final class listing and the monomial table.

use crate::{
    algebra::{Presentation, Tuple},
    ids::Element,
    partition::PartitionStore,
};
use itertools::Itertools as _;
use std::io;

/// The final partition, each class sorted, classes ordered by smallest member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quotient {
    classes: Vec<Vec<Element>>,
}

impl Quotient {
    #[must_use]
    pub fn from_store(store: &PartitionStore) -> Self {
        let classes = store
            .classes()
            .map(|label| store.members(label).iter().copied().sorted().collect_vec())
            .sorted_by_key(|class| class[0])
            .collect();
        Self { classes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Smallest member of every class.
    pub fn representatives(&self) -> impl Iterator<Item = Element> + use<'_> {
        self.classes.iter().map(|class| class[0])
    }

    #[must_use]
    pub fn classes(&self) -> &[Vec<Element>] {
        &self.classes
    }
}

fn render_tuple<const N: usize>(
    presentation: &Presentation<N>,
    tuple: &Tuple<N>,
    parenthesize: bool,
) -> String {
    let terms = tuple
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != 0)
        .map(|(k, &c)| match (k, c) {
            (0, c) => c.to_string(),
            (k, 1) => presentation.names[k].to_string(),
            (k, c) => format!("{c}{}", presentation.names[k]),
        })
        .join("+");
    let terms = if terms.is_empty() { "0".to_string() } else { terms };
    if parenthesize { format!("({terms})") } else { terms }
}

/// `e` as a sum of monomials, e.g. `2+a+3bab`.
#[must_use]
pub fn expression<const N: usize>(
    presentation: &Presentation<N>,
    e: Element,
    parenthesize: bool,
) -> String {
    render_tuple(presentation, &presentation.decode(e), parenthesize)
}

/// Representatives, a blank line, then the full member list of every class.
#[must_use]
pub fn listing<const N: usize>(quotient: &Quotient, presentation: &Presentation<N>) -> String {
    let representatives = quotient
        .representatives()
        .map(|e| expression(presentation, e, false))
        .join(",\n");
    let classes = quotient
        .classes()
        .iter()
        .map(|class| {
            let members = class
                .iter()
                .map(|&e| expression(presentation, e, false))
                .join(", ");
            format!("{{{members}}}")
        })
        .join(",\n");
    format!("{{{representatives}}}\n\n{{{classes}}}\n")
}

pub fn write_listing<const N: usize>(
    writer: &mut impl io::Write,
    quotient: &Quotient,
    presentation: &Presentation<N>,
) -> io::Result<()> {
    writer.write_all(listing(quotient, presentation).as_bytes())?;
    writer.flush()
}

/// Aligned multiplication table of the monomials.
#[must_use]
pub fn monomial_table<const N: usize>(presentation: &Presentation<N>) -> String {
    let names = &presentation.names;
    let header = names.iter().map(|name| format!("{name:>5}")).join("");
    let rule = "  ===".repeat(N);
    let rows = names
        .iter()
        .zip(&presentation.table)
        .map(|(name, row)| {
            let products = row.iter().map(|&k| format!("{:>5}", names[k])).join("");
            format!("{name:>4}|{products}\n")
        })
        .join("");
    format!("Monomial multiplication table\n     {header}\n     {rule}\n{rows}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::{ONE_GENERATOR, TWO_GENERATORS},
        partition::PartitionStore,
    };
    use expect_test::expect;

    #[test]
    fn expressions() {
        let p = TWO_GENERATORS;
        let render = |t: Tuple<7>, par| expression(&p, p.encode(&t), par);
        expect!["0"].assert_eq(&render([0; 7], false));
        expect!["(0)"].assert_eq(&render([0; 7], true));
        expect!["1"].assert_eq(&render([1, 0, 0, 0, 0, 0, 0], false));
        expect!["3+a"].assert_eq(&render([3, 1, 0, 0, 0, 0, 0], false));
        expect!["(2b+ab+3bab)"].assert_eq(&render([0, 0, 2, 1, 0, 0, 3], true));
        expect!["2+2a+2b+2ab+2ba+2aba+2bab"].assert_eq(&render([2; 7], false));
    }

    #[test]
    fn monomial_tables() {
        expect![[r#"
            Monomial multiplication table
                     1    a
                   ===  ===
               1|    1    a
               a|    a    a
        "#]]
        .assert_eq(&monomial_table(&ONE_GENERATOR));
        expect![[r#"
            Monomial multiplication table
                     1    a    b   ab   ba  aba  bab
                   ===  ===  ===  ===  ===  ===  ===
               1|    1    a    b   ab   ba  aba  bab
               a|    a    a   ab   ab  aba  aba   ab
               b|    b   ba    b  bab   ba   ba  bab
              ab|   ab  aba   ab   ab  aba  aba   ab
              ba|   ba   ba  bab  bab   ba   ba  bab
             aba|  aba  aba   ab   ab  aba  aba   ab
             bab|  bab   ba  bab  bab   ba   ba  bab
        "#]]
        .assert_eq(&monomial_table(&TWO_GENERATORS));
    }

    #[test]
    fn quotient_orders_by_smallest_member() {
        let mut store = PartitionStore::discrete(6);
        store.merge(Element(1), Element(5));
        store.merge(Element(4), Element(0));
        store.merge(Element(4), Element(2));
        let quotient = Quotient::from_store(&store);
        assert_eq!(quotient.len(), 3);
        assert_eq!(
            quotient.representatives().collect_vec(),
            [Element(0), Element(1), Element(3)]
        );
        assert_eq!(
            quotient.classes(),
            [
                vec![Element(0), Element(2), Element(4)],
                vec![Element(1), Element(5)],
                vec![Element(3)],
            ]
        );
    }

    #[test]
    fn listing_of_a_equals_one() {
        let mut store = PartitionStore::new(16);
        // classes by coefficient sum of c0 + c1*a
        for (label, members) in [
            (0, vec![0]),
            (1, vec![1, 4]),
            (2, vec![2, 5, 7, 8, 10, 13, 15]),
            (3, vec![3, 6, 9, 11, 12, 14]),
        ] {
            store.new_class(Element(label), Element(members[0]));
            for &m in &members[1..] {
                store.add_member(Element(label), Element(m));
            }
        }
        let quotient = Quotient::from_store(&store);
        expect![[r#"
            {0,
            1,
            2,
            3}

            {{0},
            {1, a},
            {2, 1+a, 3+a, 2a, 2+2a, 1+3a, 3+3a},
            {3, 2+a, 1+2a, 3+2a, 3a, 2+3a}}
        "#]]
        .assert_eq(&listing(&quotient, &ONE_GENERATOR));

        let mut written = Vec::new();
        write_listing(&mut written, &quotient, &ONE_GENERATOR).unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), listing(&quotient, &ONE_GENERATOR));
    }
}
