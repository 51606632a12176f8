mod rasterbench_test;
