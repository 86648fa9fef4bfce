use crate::console::Console;

/// Diagnostic capability: announces itself on the debug console every time it runs.
pub(crate) fn action1(console: &mut impl Console) {
    console.info_print("Action1");
}
