mod test_roboflow;
