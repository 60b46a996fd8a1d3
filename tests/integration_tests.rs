// Integration tests for trim-ps2

mod integration {
    mod bundle;
    mod cli_test;
    mod pipeline_test;
    mod pruner_test;
}
