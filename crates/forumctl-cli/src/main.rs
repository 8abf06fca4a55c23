fn main() {
    forumctl_cli::main();
}
