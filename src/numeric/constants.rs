// ============================================================================
// Stored Constants
// Truncated digits of pi and ln(10) used by argument reduction
// ============================================================================

use super::decimal::{Decimal, Finite};
use super::errors::{DecimalError, DecimalResult};
use crate::domain::Rounding;
use std::sync::OnceLock;

/// Significant digits stored for pi.
pub const PI_PRECISION: i64 = 1025;

/// Significant digits stored for ln(10).
pub const LN10_PRECISION: i64 = 1025;

/// Digits of pi, leading digit at 10^0.
const PI_DIGITS: &str = concat!(
    "31415926535897932384626433832795028841971693993751058209749445923078164062862089",
    "98628034825342117067982148086513282306647093844609550582231725359408128481117450",
    "28410270193852110555964462294895493038196442881097566593344612847564823378678316",
    "52712019091456485669234603486104543266482133936072602491412737245870066063155881",
    "74881520920962829254091715364367892590360011330530548820466521384146951941511609",
    "43305727036575959195309218611738193261179310511854807446237996274956735188575272",
    "48912279381830119491298336733624406566430860213949463952247371907021798609437027",
    "70539217176293176752384674818467669405132000568127145263560827785771342757789609",
    "17363717872146844090122495343014654958537105079227968925892354201995611212902196",
    "08640344181598136297747713099605187072113499999983729780499510597317328160963185",
    "95024459455346908302642522308253344685035261931188171010003137838752886587533208",
    "38142061717766914730359825349042875546873115956286388235378759375195778185778053",
    "21712268066130019278766111959092164201989380952572010654858632788",
);

/// Digits of ln(10), leading digit at 10^0.
const LN10_DIGITS: &str = concat!(
    "23025850929940456840179914546843642076011014886287729760333279009675726096773524",
    "80235997205089598298341967784042286248633409525465082806756666287369098781689482",
    "90720832555468084379989482623319852839350530896537773262884616336622228769821988",
    "67465436674744042432743651550489343149393914796194044002221051017141748003688084",
    "01264708068556774321622835522011480466371565912137345074785694768346361679210180",
    "64450706480002775026849167465505868569356734206705811364292245544057589257242082",
    "41314695689016758940256776311356919292033376587141660230105703089634572075440370",
    "84746994016826928280848118428931484852494864487192780967627127577539702766860595",
    "24967166741834857044225071979650047149510504922147765676369386629769795221107182",
    "64549734772662425709429322582798502585509785265383207606726317164309505995087807",
    "52371033310119785754733154142180842754386359177811705430982748238504564801909561",
    "02992918243182375253577097505395651876975103749708886921802051893395072385392051",
    "44634197265287286965110862571492198849978748873771345686209167058",
);

fn stored(cell: &'static OnceLock<Finite>, digits: &str) -> &'static Finite {
    cell.get_or_init(|| Finite::from_coefficient(false, digits.as_bytes(), 0))
}

/// Pi to `sd` significant digits. The stored digits are truncated, so
/// rounding treats them as inexact.
pub(crate) fn pi(sd: i64, rm: Rounding) -> DecimalResult<Decimal> {
    static PI: OnceLock<Finite> = OnceLock::new();
    if sd > PI_PRECISION {
        return Err(DecimalError::PrecisionLimitExceeded);
    }
    let mut x = stored(&PI, PI_DIGITS).clone();
    x.round(sd, rm, true);
    Ok(Decimal::Finite(x))
}

/// ln(10) to `sd` significant digits, truncated.
pub(crate) fn ln10(sd: i64) -> DecimalResult<Decimal> {
    static LN10: OnceLock<Finite> = OnceLock::new();
    if sd > LN10_PRECISION {
        return Err(DecimalError::PrecisionLimitExceeded);
    }
    let mut x = stored(&LN10, LN10_DIGITS).clone();
    x.round(sd, Rounding::Down, true);
    Ok(Decimal::Finite(x))
}
