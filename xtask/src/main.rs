/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle loveless-vibrato-v1 --release
///
/// This compiles the plugin as a cdylib and packages it into
/// `target/bundled/Loveless Vibrato.vst3` and `Loveless Vibrato.clap`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
