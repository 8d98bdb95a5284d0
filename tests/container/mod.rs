mod probe_sequence_tests;
