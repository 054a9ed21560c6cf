mod doctor_routes_tests;
