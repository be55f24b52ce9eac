use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRow {
    pub name: String,
    pub class: String,
    pub school: String,
}

impl LookupRow {
    pub fn new(name: &str, class: &str, school: &str) -> Self {
        Self {
            name: name.to_string(),
            class: class.to_string(),
            school: school.to_string(),
        }
    }
}

/// Search key with the name already normalized; class and school are only trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupTarget {
    pub name: String,
    pub class: String,
    pub school: String,
}

impl LookupTarget {
    pub fn new(name: &str, class: &str, school: &str) -> Self {
        Self {
            name: normalize_name(name),
            class: class.trim().to_string(),
            school: school.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    #[serde(rename = "name+class")]
    NameAndClass,
    #[serde(rename = "name-only")]
    NameOnly,
    #[serde(rename = "class-unique")]
    ClassUnique,
    #[serde(rename = "none")]
    None,
}

impl MatchStrategy {
    pub fn label(self) -> &'static str {
        match self {
            MatchStrategy::NameAndClass => "name+class",
            MatchStrategy::NameOnly => "name-only",
            MatchStrategy::ClassUnique => "class-unique",
            MatchStrategy::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome<'a> {
    pub student: Option<&'a LookupRow>,
    pub strategy: MatchStrategy,
    pub candidates: usize,
}

pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Digits only when the label has any ("7.03" -> "703"), otherwise lowercase without spaces.
pub fn normalize_class(class: &str) -> String {
    let raw = class.trim();
    if raw.is_empty() {
        return String::new();
    }
    let digits = raw.chars().filter(char::is_ascii_digit).collect::<String>();
    if !digits.is_empty() {
        return digits;
    }
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn class_equivalent(a: &str, b: &str) -> bool {
    let c1 = normalize_class(a);
    let c2 = normalize_class(b);
    if c1.is_empty() || c2.is_empty() {
        return false;
    }
    if c1 == c2 {
        return true;
    }
    let n1 = c1.trim_start_matches('0');
    let n2 = c2.trim_start_matches('0');
    !n1.is_empty() && n1 == n2
}

pub fn pick_student<'a>(rows: &'a [LookupRow], target: &LookupTarget) -> LookupOutcome<'a> {
    let in_school = rows
        .iter()
        .filter(|r| {
            let school = r.school.trim();
            target.school.is_empty() || school.is_empty() || school == target.school
        })
        .collect::<Vec<_>>();

    let same_name = |r: &&LookupRow| normalize_name(&r.name) == target.name;
    let same_class = |r: &&LookupRow| class_equivalent(&r.class, &target.class);

    let exact = in_school
        .iter()
        .copied()
        .filter(|r| same_name(r) && (target.class.is_empty() || same_class(r)))
        .collect::<Vec<_>>();
    if let Some(first) = exact.first() {
        return LookupOutcome {
            student: Some(*first),
            strategy: MatchStrategy::NameAndClass,
            candidates: exact.len(),
        };
    }

    let by_name = in_school
        .iter()
        .copied()
        .filter(same_name)
        .collect::<Vec<_>>();
    if let Some(first) = by_name.first() {
        return LookupOutcome {
            student: Some(*first),
            strategy: MatchStrategy::NameOnly,
            candidates: by_name.len(),
        };
    }

    let by_class = in_school
        .iter()
        .copied()
        .filter(|r| !target.class.is_empty() && same_class(r))
        .collect::<Vec<_>>();
    if by_class.len() == 1 {
        return LookupOutcome {
            student: Some(by_class[0]),
            strategy: MatchStrategy::ClassUnique,
            candidates: 1,
        };
    }

    LookupOutcome {
        student: None,
        strategy: MatchStrategy::None,
        candidates: 0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioExpectation {
    pub found: bool,
    pub picked_name: Option<String>,
    pub picked_class: Option<String>,
    pub strategy: Option<MatchStrategy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioActual {
    pub found: bool,
    pub picked_name: Option<String>,
    pub picked_class: Option<String>,
    pub strategy: MatchStrategy,
    pub candidates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub target: LookupTarget,
    pub expected: ScenarioExpectation,
    pub actual: ScenarioActual,
    pub pass: bool,
}

pub fn run_scenario(
    name: &str,
    rows: &[LookupRow],
    target: LookupTarget,
    expected: ScenarioExpectation,
) -> ScenarioResult {
    let picked = pick_student(rows, &target);
    let actual = ScenarioActual {
        found: picked.student.is_some(),
        picked_name: picked.student.map(|s| s.name.clone()),
        picked_class: picked.student.map(|s| s.class.clone()),
        strategy: picked.strategy,
        candidates: picked.candidates,
    };

    let pass = actual.found == expected.found
        && expected
            .picked_name
            .as_ref()
            .is_none_or(|n| actual.picked_name.as_ref() == Some(n))
        && expected
            .picked_class
            .as_ref()
            .is_none_or(|c| actual.picked_class.as_ref() == Some(c))
        && expected.strategy.is_none_or(|s| s == actual.strategy);

    ScenarioResult {
        scenario: name.to_string(),
        target,
        expected,
        actual,
        pass,
    }
}

pub fn demo_roster() -> Vec<LookupRow> {
    vec![
        LookupRow::new("Zhang San", "701", "Shiyan"),
        LookupRow::new("Li Si", "702", "Shiyan"),
        LookupRow::new("Zhang San", "702", "Shiyan"),
        LookupRow::new("Wang Wu", "7.03", "Shiyan"),
        LookupRow::new("Zhao Liu", "801", "Chengguan"),
    ]
}

fn expect(
    found: bool,
    name: Option<&str>,
    class: Option<&str>,
    strategy: MatchStrategy,
) -> ScenarioExpectation {
    ScenarioExpectation {
        found,
        picked_name: name.map(str::to_string),
        picked_class: class.map(str::to_string),
        strategy: Some(strategy),
    }
}

pub fn run_builtin_scenarios() -> Vec<ScenarioResult> {
    let rows = demo_roster();
    vec![
        run_scenario(
            "exact name and class",
            &rows,
            LookupTarget::new("Zhang San", "701", "Shiyan"),
            expect(
                true,
                Some("Zhang San"),
                Some("701"),
                MatchStrategy::NameAndClass,
            ),
        ),
        run_scenario(
            "class label format (7.03 vs 703)",
            &rows,
            LookupTarget::new("Wang Wu", "703", "Shiyan"),
            expect(
                true,
                Some("Wang Wu"),
                Some("7.03"),
                MatchStrategy::NameAndClass,
            ),
        ),
        run_scenario(
            "same name in two classes",
            &rows,
            LookupTarget::new("Zhang San", "702", "Shiyan"),
            expect(
                true,
                Some("Zhang San"),
                Some("702"),
                MatchStrategy::NameAndClass,
            ),
        ),
        run_scenario(
            "name only, class omitted",
            &rows,
            LookupTarget::new("Li Si", "", "Shiyan"),
            expect(true, Some("Li Si"), Some("702"), MatchStrategy::NameAndClass),
        ),
        run_scenario(
            "other school is not matched",
            &rows,
            LookupTarget::new("Zhang San", "701", "Chengguan"),
            expect(false, None, None, MatchStrategy::None),
        ),
        run_scenario(
            "no matching row",
            &rows,
            LookupTarget::new("Nobody", "999", "Shiyan"),
            expect(false, None, None, MatchStrategy::None),
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/lookup.rs"]
mod tests;
