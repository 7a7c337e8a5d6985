fn main() {
    anima::main();
}
