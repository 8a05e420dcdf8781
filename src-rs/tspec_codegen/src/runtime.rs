//! The Java support class every generated module uses
//!
//! Matching here follows `tspec_analysis::matching`, so a `match()` folded
//! at check time gives the same answer as the generated code at run time.

use crate::GeneratorConfig;

/// Name of the support class and its file
pub const RUNTIME_CLASS: &str = "TspecRuntime";

const RUNTIME_BODY: &str = r#"public final class TspecRuntime {
    private TspecRuntime() {
    }

    public enum Verdict {
        NONE, PASS, INCONC, FAIL, ERROR;

        /** Combines two verdicts; a verdict can only get worse. */
        public Verdict merge(Verdict other) {
            return other.ordinal() > ordinal() ? other : this;
        }
    }

    public enum Handling {
        DEFAULT, ERROR, WARNING, IGNORE
    }

    /** A matcher for values of type T. An omitted value is {@code null}. */
    @FunctionalInterface
    public interface Template<T> {
        boolean match(T value);
    }

    private static final ThreadLocal<Verdict> VERDICT = ThreadLocal.withInitial(() -> Verdict.NONE);

    public static void resetVerdict() {
        VERDICT.set(Verdict.NONE);
    }

    public static void setVerdict(Verdict verdict) {
        VERDICT.set(VERDICT.get().merge(verdict));
    }

    public static Verdict getVerdict() {
        return VERDICT.get();
    }

    public static <T> Template<T> any() {
        return value -> value != null;
    }

    public static <T> Template<T> anyOrOmit() {
        return value -> true;
    }

    public static <T> Template<T> omit() {
        return value -> value == null;
    }

    public static <T> Template<T> specific(T expected) {
        return value -> expected.equals(value);
    }

    /** Matches a set of value holding the same elements in any order. */
    public static <T> Template<java.util.List<T>> specificSet(java.util.List<T> expected) {
        return values -> sameElements(expected, values);
    }

    public static <T> Template<T> valueList(java.util.List<Template<T>> templates) {
        return value -> {
            for (Template<T> template : templates) {
                if (template.match(value)) {
                    return true;
                }
            }
            return false;
        };
    }

    public static <T> Template<T> complement(java.util.List<Template<T>> templates) {
        return value -> value != null && !valueList(templates).match(value);
    }

    public static <T extends Comparable<T>> Template<T> range(T lower, T upper) {
        return value -> value != null && lower.compareTo(value) <= 0 && value.compareTo(upper) <= 0;
    }

    /** Positional matching of a record of value. */
    public static <T> Template<java.util.List<T>> recordOf(java.util.List<Template<T>> patterns) {
        return values -> {
            if (values == null || values.size() != patterns.size()) {
                return false;
            }
            for (int i = 0; i < patterns.size(); i++) {
                if (!patterns.get(i).match(values.get(i))) {
                    return false;
                }
            }
            return true;
        };
    }

    /**
     * Unordered matching of a set of value: the sizes must be equal and every
     * pattern must match at least one element.
     */
    public static <T> Template<java.util.List<T>> setOf(java.util.List<Template<T>> patterns) {
        return values -> {
            if (values == null || values.size() != patterns.size()) {
                return false;
            }
            for (Template<T> pattern : patterns) {
                boolean found = false;
                for (T value : values) {
                    if (pattern.match(value)) {
                        found = true;
                        break;
                    }
                }
                if (!found) {
                    return false;
                }
            }
            return true;
        };
    }

    public static long div(long left, long right) {
        if (left == Long.MIN_VALUE && right == -1) {
            throw new ArithmeticException("integer overflow");
        }
        return left / right;
    }

    /** Remainder with the sign of the divisor. */
    public static long mod(long left, long right) {
        return Math.floorMod(left, right);
    }

    /** Remainder with the sign of the dividend. */
    public static long rem(long left, long right) {
        return left % right;
    }

    public static <T> java.util.List<T> concat(java.util.List<T> left, java.util.List<T> right) {
        java.util.List<T> result = new java.util.ArrayList<>(left);
        result.addAll(right);
        return java.util.Collections.unmodifiableList(result);
    }

    /**
     * Equality of set of values: equal sizes and every element present the
     * same number of times in both.
     */
    public static boolean sameElements(java.util.List<?> left, java.util.List<?> right) {
        if (left == null || right == null) {
            return left == right;
        }
        if (left.size() != right.size()) {
            return false;
        }
        java.util.List<Object> unmatched = new java.util.ArrayList<>(right);
        for (Object element : left) {
            if (!unmatched.remove(element)) {
                return false;
            }
        }
        return true;
    }

    /** A hash code that agrees with {@link #sameElements}. */
    public static int unorderedHash(java.util.List<?> values) {
        int hash = 0;
        if (values != null) {
            for (Object value : values) {
                hash += java.util.Objects.hashCode(value);
            }
        }
        return hash;
    }

    /** Evaluates an expression for its side effects only. */
    public static void discard(Object value) {
    }
}
"#;

/// Returns the source of the support class
pub fn runtime_source(config: &GeneratorConfig) -> String {
    let mut source = String::new();
    if let Some(package) = config.package() {
        source.push_str(&format!("package {package};\n\n"));
    }
    source.push_str(RUNTIME_BODY);
    source
}
