//! Recovers objective, problem size and assignments from the free-form report `glpsol`
//! prints on stdout. Each concern is a separate function over the whole report; none of
//! them fail, a missing pattern simply yields nothing.

use std::{collections::BTreeMap, str::FromStr};

use tracing::{debug, warn};

use crate::{
    instance::{AssignmentProblem, BusId, DualInstance, SingleInstance, SlotId, WorkshopId},
    solution::{DualSolution, Placement, ProblemSize, SingleSolution},
};

/// Cursor over the remainder of a line. Every combinator consumes `self` and returns the
/// advanced scanner on success, so failed attempts need no backtracking.
#[derive(Debug, Clone, Copy)]
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn skip_whitespace(self) -> Self {
        Self::new(self.rest.trim_start())
    }

    fn tag(self, tag: &str) -> Option<Self> {
        self.rest.strip_prefix(tag).map(Self::new)
    }

    fn opt_tag(self, tag: &str) -> Self {
        self.tag(tag).unwrap_or(self)
    }

    /// Splits off the longest prefix whose chars satisfy `pred`; fails if it is empty.
    fn take_while(self, pred: impl Fn(char) -> bool) -> Option<(&'a str, Self)> {
        let end = self
            .rest
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest.len());
        (end > 0).then(|| (&self.rest[..end], Self::new(&self.rest[end..])))
    }

    /// Unsigned decimal integer; fails on overflow of `T`.
    fn integer<T: FromStr>(self) -> Option<(T, Self)> {
        let (digits, rest) = self.take_while(|c| c.is_ascii_digit())?;
        Some((digits.parse().ok()?, rest))
    }

    fn sign(self) -> Self {
        self.tag("-").or_else(|| self.tag("+")).unwrap_or(self)
    }

    /// Decimal or exponential notation with an optional sign, e.g. `-1.5`, `.25`, `1.23e+02`.
    fn number(self) -> Option<(f64, Self)> {
        let start = self.rest;
        let (mantissa, mut rest) = self
            .sign()
            .take_while(|c| c.is_ascii_digit() || c == '.')?;
        if !mantissa.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }

        // an exponent only counts if it is complete
        if let Some(exp) = rest.tag("e").or_else(|| rest.tag("E"))
            && let Some((_, after)) = exp.sign().take_while(|c| c.is_ascii_digit())
        {
            rest = after;
        }

        let text = &start[..start.len() - rest.rest.len()];
        Some((text.parse().ok()?, rest))
    }
}

/// Starts a scanner at every occurrence of `anchor` in `line`. Occurrences directly preceded
/// by an identifier char are skipped, so `x[` does not match inside `max[`.
fn anchored<'a>(line: &'a str, anchor: &'a str) -> impl Iterator<Item = Scanner<'a>> + 'a {
    line.match_indices(anchor).filter_map(move |(pos, _)| {
        let preceding = line[..pos].chars().next_back();
        if preceding.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        Scanner::new(&line[pos..]).tag(anchor)
    })
}

/// Value of the last `mip = <number>` in the report. `glpsol` prints one line per improved
/// incumbent, so the last one is the final objective.
pub fn parse_objective(report: &str) -> Option<f64> {
    report
        .lines()
        .flat_map(|line| anchored(line, "mip"))
        .filter_map(|s| {
            let (value, _) = s.skip_whitespace().tag("=")?.skip_whitespace().number()?;
            Some(value)
        })
        .last()
}

/// `<rows> rows, <columns> columns` at the start of a line
fn rows_and_columns(line: &str) -> Option<ProblemSize> {
    let s = Scanner::new(line).skip_whitespace();
    let (constraints, s) = s.integer::<u64>()?;
    let s = s.skip_whitespace().tag("row")?.opt_tag("s").tag(",")?;
    let (variables, s) = s.skip_whitespace().integer::<u64>()?;
    s.skip_whitespace().tag("column")?;

    Some(ProblemSize {
        constraints,
        variables,
    })
}

/// Problem size as reported by the solver. The counts right after the simplex banner are
/// preferred; otherwise the first size line anywhere in the report is used.
pub fn parse_problem_size(report: &str) -> Option<ProblemSize> {
    let mut lines = report.lines().peekable();
    let mut first_seen = None;

    while let Some(line) = lines.next() {
        if line.trim_start().starts_with("GLPK Simplex Optimizer") {
            if let Some(size) = lines.peek().and_then(|next| rows_and_columns(next)) {
                return Some(size);
            }
        } else if first_seen.is_none() {
            first_seen = rows_and_columns(line);
        }
    }

    first_seen
}

/// All `x[<bus>,<slot>] = 1` echoes as `(bus, slot)` in report order.
pub fn parse_single_assignments(report: &str) -> Vec<(BusId, SlotId)> {
    report
        .lines()
        .flat_map(|line| anchored(line, "x["))
        .filter_map(|s| {
            let (bus, s) = s.skip_whitespace().integer::<BusId>()?;
            let s = s.skip_whitespace().tag(",")?;
            let (slot, s) = s.skip_whitespace().integer::<SlotId>()?;
            let s = s.skip_whitespace().tag("]")?.skip_whitespace().tag("=")?;
            let (value, _) = s.skip_whitespace().number()?;
            (value == 1.0).then_some((bus, slot))
        })
        .collect()
}

/// All `Franja:<slot>, Taller:<workshop>, Bus:<bus>` lines as `(bus, placement)` in report order.
pub fn parse_dual_assignments(report: &str) -> Vec<(BusId, Placement)> {
    report
        .lines()
        .flat_map(|line| anchored(line, "Franja:"))
        .filter_map(|s| {
            let (slot, s) = s.skip_whitespace().integer::<SlotId>()?;
            let s = s.skip_whitespace().tag(",")?.skip_whitespace().tag("Taller:")?;
            let (workshop, s) = s.skip_whitespace().integer::<WorkshopId>()?;
            let s = s.skip_whitespace().tag(",")?.skip_whitespace().tag("Bus:")?;
            let (bus, _) = s.skip_whitespace().integer::<BusId>()?;
            Some((bus, Placement { slot, workshop }))
        })
        .collect()
}

/// Keeps assignments of known buses to known slots (and workshops); a bus reported twice
/// keeps its last assignment.
fn collect_assignments<A: std::fmt::Debug>(
    pairs: Vec<(BusId, A)>,
    num_buses: u32,
    is_known: impl Fn(&A) -> bool,
) -> BTreeMap<BusId, A> {
    let mut assignments = BTreeMap::new();
    for (bus, assignment) in pairs {
        if bus == 0 || bus > num_buses {
            warn!("Report assigns unknown bus {bus}; ignored");
            continue;
        }
        if !is_known(&assignment) {
            warn!("Report assigns bus {bus} to unknown {assignment:?}; ignored");
            continue;
        }
        if assignments.insert(bus, assignment).is_some() {
            debug!("Report assigns bus {bus} more than once; keeping the last assignment");
        }
    }
    assignments
}

impl SingleSolution {
    pub fn from_report(report: &str, instance: &SingleInstance) -> Self {
        let assignments = collect_assignments(
            parse_single_assignments(report),
            instance.num_buses,
            |slot| (1..=instance.num_slots).contains(slot),
        );
        let unassigned = instance
            .buses()
            .filter(|bus| !assignments.contains_key(bus))
            .collect();

        Self {
            objective: parse_objective(report),
            size: parse_problem_size(report).unwrap_or_else(|| instance.fallback_size()),
            assignments,
            unassigned,
        }
    }
}

impl DualSolution {
    pub fn from_report(report: &str, instance: &DualInstance) -> Self {
        let assignments = collect_assignments(
            parse_dual_assignments(report),
            instance.num_buses,
            |placement| {
                (1..=instance.num_slots).contains(&placement.slot)
                    && (1..=instance.num_workshops).contains(&placement.workshop)
            },
        );

        Self {
            objective: parse_objective(report),
            size: parse_problem_size(report).unwrap_or_else(|| instance.fallback_size()),
            assignments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::tests::read_test_file;

    fn single_instance(num_slots: u32, num_buses: u32) -> SingleInstance {
        SingleInstance {
            num_slots,
            num_buses,
            assigned_cost: 1.0,
            unassigned_cost: 1.0,
            distances: vec![1.0; num_buses as usize],
            passengers: vec![1; num_buses as usize],
        }
    }

    fn dual_instance(num_slots: u32, num_buses: u32, num_workshops: u32) -> DualInstance {
        DualInstance {
            num_slots,
            num_buses,
            num_workshops,
            shared_passengers: vec![vec![0; num_buses as usize]; num_buses as usize],
            available_slots: vec![vec![1; num_workshops as usize]; num_slots as usize],
        }
    }

    #[test]
    fn objective_formats() {
        assert_eq!(parse_objective("mip = 123.45"), Some(123.45));
        assert_eq!(parse_objective("mip=7"), Some(7.0));
        assert_eq!(parse_objective("+  12: mip =   1.230000000e+02 >= 1.1e+02"), Some(123.0));
        assert_eq!(parse_objective("mip = -4.5E-1"), Some(-0.45));
        assert_eq!(parse_objective("mip = .5"), Some(0.5));
    }

    #[test]
    fn objective_takes_last_incumbent() {
        let report = "+    5: mip =     not found yet >=              -inf        (1; 0)\n\
                      +    9: mip =   5.000000000e+01 >=   1.000000000e+01  80.0% (4; 0)\n\
                      +   14: mip =   2.000000000e+01 >=     tree is empty   0.0% (0; 7)\n";
        assert_eq!(parse_objective(report), Some(20.0));
    }

    #[test]
    fn objective_missing() {
        assert_eq!(parse_objective(""), None);
        assert_eq!(parse_objective("mip = not found yet"), None);
        assert_eq!(parse_objective("mip = ."), None);
        assert_eq!(parse_objective("skimip = 3"), None);
    }

    #[test]
    fn incomplete_exponent_is_not_part_of_number() {
        assert_eq!(parse_objective("mip = 2e"), Some(2.0));
        assert_eq!(parse_objective("mip = 2e+x"), Some(2.0));
    }

    #[test]
    fn problem_size_after_simplex_banner() {
        let report = "GLPK Integer Optimizer 5.0\n\
                      11 rows, 15 columns, 45 non-zeros\n\
                      Preprocessing...\n\
                      GLPK Simplex Optimizer 5.0\n\
                      10 rows, 12 columns, 30 non-zeros\n";
        assert_eq!(
            parse_problem_size(report),
            Some(ProblemSize {
                constraints: 10,
                variables: 12
            })
        );
    }

    #[test]
    fn problem_size_without_banner() {
        let report = "Generating cost...\n  1 row, 1 column, 1 non-zero\n3 rows, 4 columns\n";
        assert_eq!(
            parse_problem_size(report),
            Some(ProblemSize {
                constraints: 1,
                variables: 1
            })
        );
        assert_eq!(parse_problem_size("rows, columns\n12 rows\n"), None);
    }

    #[test]
    fn single_assignment_tokens() {
        let report = "x[1,2] = 1\nx[ 3 , 4 ]=1\nx[5,6] = 0\nmax[7,8] = 1\nx[9,1] = 1.0\nx[2,2] = 10\n";
        assert_eq!(
            parse_single_assignments(report),
            vec![(1, 2), (3, 4), (9, 1)]
        );
    }

    #[test]
    fn dual_assignment_tokens() {
        let report = "Franja:1, Taller:3, Bus:2\nFranja: 2 ,Taller: 1, Bus: 10\nFranja:1, Bus:3\n";
        assert_eq!(
            parse_dual_assignments(report),
            vec![
                (2, Placement { slot: 1, workshop: 3 }),
                (10, Placement { slot: 2, workshop: 1 })
            ]
        );
    }

    #[test]
    fn single_solution_from_minimal_report() {
        let report = "mip = 123.45\n10 rows, 6 columns\nx[2,1] = 1\nx[5,3] = 1\n";
        let solution = SingleSolution::from_report(report, &single_instance(3, 5));

        assert_eq!(solution.objective, Some(123.45));
        assert_eq!(solution.size.variables, 6);
        assert_eq!(solution.size.constraints, 10);
        assert_eq!(solution.slot_of(2), Some(1));
        assert_eq!(solution.slot_of(5), Some(3));
        assert_eq!(solution.assignments.len(), 2);
        assert_eq!(solution.unassigned, vec![1, 3, 4]);
    }

    #[test]
    fn single_solution_falls_back_to_computed_size() {
        let solution = SingleSolution::from_report("nothing to see", &single_instance(3, 5));

        assert_eq!(solution.objective, None);
        assert_eq!(
            solution.size,
            ProblemSize {
                constraints: 8,
                variables: 15
            }
        );
        assert!(solution.assignments.is_empty());
        assert_eq!(solution.unassigned, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_solution_ignores_unknown_buses() {
        let report = "x[0,1] = 1\nx[6,1] = 1\nx[1,1] = 1\nx[1,2] = 1\n";
        let solution = SingleSolution::from_report(report, &single_instance(3, 5));

        assert_eq!(solution.assignments.len(), 1);
        assert_eq!(solution.slot_of(1), Some(2));
        assert_eq!(solution.unassigned, vec![2, 3, 4, 5]);
    }

    #[test]
    fn single_solution_ignores_unknown_slots() {
        let report = "x[1,9] = 1\nx[2,0] = 1\nx[3,3] = 1\n";
        let solution = SingleSolution::from_report(report, &single_instance(3, 5));

        assert_eq!(solution.assignments.len(), 1);
        assert_eq!(solution.slot_of(3), Some(3));
        assert_eq!(solution.unassigned, vec![1, 2, 4, 5]);
    }

    #[test]
    fn dual_solution_ignores_unknown_slots_and_workshops() {
        let report = "Franja:0, Taller:1, Bus:1\n\
                      Franja:1, Taller:7, Bus:2\n\
                      Franja:3, Taller:1, Bus:3\n\
                      Franja:2, Taller:2, Bus:3\n";
        let solution = DualSolution::from_report(report, &dual_instance(2, 3, 2));

        assert_eq!(solution.assignments.len(), 1);
        assert_eq!(
            solution.placement_of(3),
            Some(Placement {
                slot: 2,
                workshop: 2
            })
        );
        assert!(!solution.is_infeasible());
    }

    #[test]
    fn dual_solution_without_matches_is_infeasible() {
        let report = "PROBLEM HAS NO INTEGER FEASIBLE SOLUTION\n";
        let solution = DualSolution::from_report(report, &dual_instance(2, 3, 2));

        assert!(solution.is_infeasible());
        assert!(solution.assignments.is_empty());
        assert_eq!(solution.objective, None);
        assert_eq!(
            solution.size,
            ProblemSize {
                constraints: 5,
                variables: 6
            }
        );
    }

    #[test]
    fn single_glpsol_report() {
        let report = read_test_file("reports/single_optimal.txt");
        let solution = SingleSolution::from_report(&report, &single_instance(3, 5));

        assert_eq!(solution.objective, Some(1470.0));
        assert_eq!(
            solution.size,
            ProblemSize {
                constraints: 8,
                variables: 15
            }
        );
        assert_eq!(solution.slot_of(1), Some(2));
        assert_eq!(solution.slot_of(3), Some(1));
        assert_eq!(solution.slot_of(4), Some(3));
        assert_eq!(solution.unassigned, vec![2, 5]);
    }

    #[test]
    fn dual_glpsol_report() {
        let report = read_test_file("reports/dual_optimal.txt");
        let solution = DualSolution::from_report(&report, &dual_instance(3, 4, 2));

        assert!(!solution.is_infeasible());
        assert_eq!(solution.objective, Some(3.0));
        assert_eq!(solution.assignments.len(), 4);
        assert_eq!(
            solution.placement_of(1),
            Some(Placement { slot: 1, workshop: 1 })
        );
        assert_eq!(
            solution.placement_of(4),
            Some(Placement { slot: 3, workshop: 2 })
        );
    }

    #[test]
    fn dual_glpsol_report_infeasible() {
        let report = read_test_file("reports/dual_infeasible.txt");
        let solution = DualSolution::from_report(&report, &dual_instance(1, 3, 1));

        assert!(solution.is_infeasible());
        assert_eq!(solution.objective, None);
    }
}
