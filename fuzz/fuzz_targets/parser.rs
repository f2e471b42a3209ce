#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    // Anything that parses must print back to text that parses to the same tree,
    // unless it holds a quoted string or a float that doesn't compare equal to itself
    if let Ok(sexp) = lisple::parse(input) {
        let printed = sexp.to_string();
        if !printed.contains('"') && !printed.contains("NaN") {
            assert_eq!(lisple::parse(&printed), Ok(sexp), "{:?} printed as {:?}", input, printed);
        }
    }
});
