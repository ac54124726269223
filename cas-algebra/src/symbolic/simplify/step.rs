/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `2 + 3 = 5`
    /// `1/3 * 3/4 = 1/4`
    /// `2^10 = 1024`
    FoldNumbers,

    /// `sin(0) = 0`
    /// `factorial(5) = 120`
    FoldFunction,

    /// `1 < 2 = true`
    FoldComparison,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `a+a = 2a`
    /// `a+a+a = 3a`
    /// `2a+3a = 5a`
    /// etc.
    CombineLikeTerms,

    /// `a/c + b/c = (a+b)/c`
    SameDenominator,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `a * (b/c) = (a*b)/c`
    MergeDivide,

    /// `a*a = a^2`
    /// `a*a*a = a^3`
    /// `a^2*a^3 = a^5`
    /// etc.
    CombineLikeFactors,

    /// `a/1 = a`
    DivideByOne,

    /// `0/a = 0`
    ZeroNumerator,

    /// `a/a = 1`
    DivideSelf,

    /// `(a/b)/c = a/(b*c)`
    /// `a/(b/c) = (a*c)/b`
    NestedDivide,

    /// `3/12 = 1/4`
    /// `6x^3/(4x) = 3x^2/2`
    ReduceFraction,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `a^b^c = a^(b*c)`
    PowerPower,

    /// `(a*b)^c = a^c*b^c`
    DistributePower,

    /// `a^(-n) = 1/a^n`
    NegativeExponent,

    /// `sqrt(12) = 2*sqrt(3)`
    ExtractRoot,

    /// `sqrt(-4) = 2i`
    ImaginaryRoot,

    /// `(-8)^(1/3) = -2`
    OddRootOfNegative,

    /// `log(a, a) = 1`
    LogSelf,

    /// `log(a, 1) = 0`
    LogOne,

    /// `log(a, a^x) = x`
    LogPower,

    /// `a^log(a, x) = x`
    PowerLog,

    /// `sin(x)` identity
    Sin,

    /// `cos(x)` identity
    Cos,

    /// `tan(x)` identity
    Tan,

    /// `sin(-x) = -sin(x)`
    /// `cos(-x) = cos(x)`
    TrigSymmetry,

    /// `sin(arcsin(x)) = x`
    InverseTrig,

    /// `true and a = a`
    /// `not false = true`
    LogicConstant,

    /// `a and a = a`
    /// `a or a = a`
    LogicIdempotent,

    /// `a = a` is `true`
    /// `a < a` is `false`
    CompareSelf,

    /// `0 < a = a > 0`
    CompareFlip,

    /// `{1, 2} ∪ {2, 3} = {1, 2, 3}`
    SetUnion,

    /// `{1, 2} ∩ {2, 3} = {2}`
    SetIntersection,

    /// `{1, 2} \ {2, 3} = {1}`
    SetMinus,

    /// `A ∪ A = A`
    /// `A ∪ ∅ = A`
    SetIdentity,

    /// `2 in {1, 2} = true`
    Membership,

    /// `[a; a] = {a}`
    DegenerateInterval,

    /// `a provided true = a`
    ProvidedTrue,

    /// `a provided false = NaN`
    ProvidedFalse,

    /// `(a provided b) provided c = a provided (b and c)`
    ProvidedNested,

    /// `(a provided b) + c = (a + c) provided b`
    ProvidedLift,

    /// Removes impossible cases from a piecewise expression.
    PiecewisePrune,

    /// `(x -> f(x))(a) = f(a)`
    BetaReduce,

    /// `derivative(x^2, x, 1) = 2x`
    EvaluateDerivative,

    /// `a*(b+c) = a*b + a*c`
    DistributiveProperty,

    /// `a*b + a*c = a*(b+c)`
    FactorCommon,

    /// `1/2 * x = x / 2`
    RationalCoefficient,
}
