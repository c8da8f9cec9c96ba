fn main() -> std::process::ExitCode {
    approval_gate::run()
}
