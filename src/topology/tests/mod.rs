mod topology_tests;
