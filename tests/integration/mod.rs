mod rank_flow_tests;
